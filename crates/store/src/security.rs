// Owner-only file handling for the files we write (state, config). Nothing
// here touches the editor's database.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn ensure_owner_only_file(path: &Path) -> io::Result<()> {
    ensure_mode(path, 0o600)
}

pub fn ensure_owner_only_dir(path: &Path) -> io::Result<()> {
    ensure_mode(path, 0o700)
}

#[cfg(unix)]
fn ensure_mode(path: &Path, wanted: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if !path.exists() {
        return Ok(());
    }
    let mode = fs::metadata(path)?.permissions().mode() & 0o777;
    if mode != wanted {
        fs::set_permissions(path, fs::Permissions::from_mode(wanted))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_mode(_path: &Path, _wanted: u32) -> io::Result<()> {
    Ok(())
}

fn open_private_truncate(path: &Path) -> io::Result<File> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;

        OpenOptions::new().create(true).write(true).truncate(true).mode(0o600).open(path)
    }
    #[cfg(not(unix))]
    {
        OpenOptions::new().create(true).write(true).truncate(true).open(path)
    }
}

/// Replace `path` with `contents` through a sibling temp file and a rename, so
/// readers never observe a half-written file. A parent directory created here
/// is owner-only; an existing one keeps its mode.
pub fn write_private_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            ensure_owner_only_dir(parent)?;
        }
    }

    let tmp_path = temp_path_for(path);
    let mut file = open_private_truncate(&tmp_path)?;
    file.write_all(contents)?;
    file.sync_data()?;
    drop(file);

    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    ensure_owner_only_file(path)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let file_name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp.{}.{nonce}", std::process::id()))
}
