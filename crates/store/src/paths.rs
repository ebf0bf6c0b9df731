// Discovery of the editor's executable and workspace database.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Release channel. Each keeps its own database directory.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    Stable,
    Preview,
    Dev,
}

impl Channel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Preview => "preview",
            Self::Dev => "dev",
        }
    }

    fn db_dir_name(self) -> &'static str {
        match self {
            Self::Stable => "0-stable",
            Self::Preview => "0-preview",
            Self::Dev => "0-dev",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds one path on the local machine.
pub trait PathResolver {
    fn resolve(&self) -> Option<PathBuf>;
}

/// Fixed candidates checked in priority order, optionally followed by a
/// `$PATH`-style directory search for a program name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePaths {
    candidates: Vec<PathBuf>,
    search: Option<(String, Vec<PathBuf>)>,
}

impl CandidatePaths {
    pub fn new(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
        Self { candidates: candidates.into_iter().collect(), search: None }
    }

    /// Fall back to looking up `program` in the directories of `$PATH`.
    pub fn with_path_fallback(self, program: &str) -> Self {
        let dirs = std::env::var_os("PATH")
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default();
        self.with_search_dirs(program, dirs)
    }

    pub fn with_search_dirs(mut self, program: &str, dirs: Vec<PathBuf>) -> Self {
        self.search = Some((program.to_string(), dirs));
        self
    }
}

impl PathResolver for CandidatePaths {
    fn resolve(&self) -> Option<PathBuf> {
        if let Some(found) = self.candidates.iter().find(|path| path.is_file()) {
            return Some(found.clone());
        }
        let (program, dirs) = self.search.as_ref()?;
        dirs.iter().map(|dir| dir.join(program)).find(|path| path.is_file())
    }
}

/// A path given explicitly (config or flag). Resolves only if it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitPath(pub PathBuf);

impl PathResolver for ExplicitPath {
    fn resolve(&self) -> Option<PathBuf> {
        self.0.is_file().then(|| self.0.clone())
    }
}

/// Database candidates for `channel`, its own directory first.
pub fn default_database_candidates(home: &Path, channel: Channel) -> Vec<PathBuf> {
    let db_root = if cfg!(target_os = "macos") {
        home.join("Library").join("Application Support").join("Zed").join("db")
    } else {
        home.join(".local").join("share").join("zed").join("db")
    };

    let mut dirs = vec![channel.db_dir_name()];
    for fallback in ["0-stable", "0-global", "0-preview"] {
        if !dirs.contains(&fallback) {
            dirs.push(fallback);
        }
    }

    let mut candidates: Vec<PathBuf> =
        dirs.into_iter().map(|dir| db_root.join(dir).join("db.sqlite")).collect();
    // Layout used by early releases.
    candidates.push(home.join(".config").join("zed").join("db"));
    candidates
}

pub fn default_executable_candidates(home: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if cfg!(target_os = "macos") {
        candidates.push(PathBuf::from("/Applications/Zed.app/Contents/MacOS/cli"));
        candidates.push(home.join("Applications/Zed.app/Contents/MacOS/cli"));
        candidates.push(PathBuf::from("/opt/homebrew/bin/zed"));
    }
    candidates.extend([
        home.join(".local").join("bin").join("zed"),
        PathBuf::from("/usr/bin/zed"),
        PathBuf::from("/usr/local/bin/zed"),
        home.join("bin").join("zed"),
    ]);
    candidates
}
