// Identity URIs: the comparison-stable key for a workspace.
//
// Local:  `file://` + path, NFC-normalized, not percent-encoded.
// Remote: `ssh://[user@]host[:port]/path`, built through `url` so the
//         authority is validated and the path is escaped consistently.

use std::path::Path;

use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::types::RemoteHost;

pub const FILE_URI_PREFIX: &str = "file://";
const SSH_SCHEME: &str = "ssh";

/// Identity of a local workspace rooted at `path`. `None` for a blank path.
pub fn local_uri(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some(format!("{FILE_URI_PREFIX}{}", nfc(path)))
}

/// Identity of a remote workspace. `None` when the host is blank or not a
/// valid URI authority, or the path is blank.
pub fn remote_uri(remote: &RemoteHost, path: &str) -> Option<String> {
    let host = remote.host.trim();
    let path = path.trim();
    if host.is_empty() || path.is_empty() {
        return None;
    }

    let mut url = Url::parse(&format!("{SSH_SCHEME}://{host}")).ok()?;
    url.host_str().filter(|parsed| !parsed.is_empty())?;

    if let Some(user) = remote.user.as_deref().map(str::trim).filter(|user| !user.is_empty()) {
        url.set_username(user).ok()?;
    }
    if let Some(port) = remote.port {
        url.set_port(Some(port)).ok()?;
    }

    let path = nfc(path);
    if path.starts_with('/') {
        url.set_path(&path);
    } else {
        url.set_path(&format!("/{path}"));
    }

    Some(url.into())
}

/// The filesystem path behind a `file://` identity.
pub fn local_path_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(FILE_URI_PREFIX).filter(|path| !path.is_empty())
}

/// Normalize a user-supplied identity: URIs are NFC-normalized as-is, anything
/// else is treated as a local path.
pub fn target_uri(target: &str) -> Option<String> {
    let target = target.trim();
    if target.contains("://") {
        return Some(nfc(target));
    }
    local_uri(target)
}

/// `user@host:port` for display.
pub fn remote_authority(remote: &RemoteHost) -> String {
    let mut authority = String::new();
    if let Some(user) = remote.user.as_deref().filter(|user| !user.trim().is_empty()) {
        authority.push_str(user.trim());
        authority.push('@');
    }
    authority.push_str(remote.host.trim());
    if let Some(port) = remote.port {
        authority.push(':');
        authority.push_str(&port.to_string());
    }
    authority
}

/// Last path component, or the whole path when there is none (e.g. `/`).
pub fn display_name(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    Path::new(trimmed)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn nfc(value: &str) -> String {
    value.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(host: &str, user: Option<&str>, port: Option<u16>) -> RemoteHost {
        RemoteHost { host: host.into(), user: user.map(Into::into), port }
    }

    #[test]
    fn local_uri_prefixes_file_scheme() {
        assert_eq!(local_uri("/home/me/app").as_deref(), Some("file:///home/me/app"));
        assert_eq!(local_uri("   "), None);
    }

    #[test]
    fn local_uri_normalizes_unicode() {
        let decomposed = local_uri("/home/me/cafe\u{0301}").unwrap();
        let composed = local_uri("/home/me/caf\u{00e9}").unwrap();
        assert_eq!(decomposed, composed);
    }

    #[test]
    fn remote_uri_includes_user_and_port() {
        let uri = remote_uri(&remote("build.box", Some("deploy"), Some(2222)), "/srv/app");
        assert_eq!(uri.as_deref(), Some("ssh://deploy@build.box:2222/srv/app"));
    }

    #[test]
    fn remote_uri_without_user_or_port() {
        let uri = remote_uri(&remote("build.box", None, None), "/srv/app");
        assert_eq!(uri.as_deref(), Some("ssh://build.box/srv/app"));
    }

    #[test]
    fn remote_uri_roots_relative_paths() {
        let uri = remote_uri(&remote("box", None, None), "~/code");
        assert_eq!(uri.as_deref(), Some("ssh://box/~/code"));
    }

    #[test]
    fn remote_uri_rejects_blank_or_invalid_host() {
        assert_eq!(remote_uri(&remote("", None, None), "/srv"), None);
        assert_eq!(remote_uri(&remote("bad host", None, None), "/srv"), None);
        assert_eq!(remote_uri(&remote("box", None, None), " "), None);
    }

    #[test]
    fn local_path_roundtrip() {
        let uri = local_uri("/tmp/work").unwrap();
        assert_eq!(local_path_from_uri(&uri), Some("/tmp/work"));
        assert_eq!(local_path_from_uri("ssh://box/tmp"), None);
        assert_eq!(local_path_from_uri("file://"), None);
    }

    #[test]
    fn target_uri_accepts_paths_and_uris() {
        assert_eq!(target_uri("/a/b").as_deref(), Some("file:///a/b"));
        assert_eq!(target_uri("ssh://box/a").as_deref(), Some("ssh://box/a"));
        assert_eq!(target_uri(""), None);
    }

    #[test]
    fn authority_formatting() {
        assert_eq!(remote_authority(&remote("box", Some("me"), Some(22))), "me@box:22");
        assert_eq!(remote_authority(&remote("box", None, None)), "box");
    }

    #[test]
    fn display_name_uses_last_component() {
        assert_eq!(display_name("/home/me/project"), "project");
        assert_eq!(display_name("/home/me/project/"), "project");
        assert_eq!(display_name("/"), "/");
    }
}
