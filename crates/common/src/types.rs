// Core domain types shared across all zedrecent crates.

use serde::{Deserialize, Serialize};

/// Where a workspace lives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceKind {
    Local,
    Remote,
}

impl WorkspaceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// Connection details for a workspace opened over SSH.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteHost {
    pub host: String,
    pub user: Option<String>,
    pub port: Option<u16>,
}

/// One accepted row of the editor's workspace table.
///
/// `paths` is the raw comma-joined path list exactly as the store returned it
/// (trimmed, never blank). `opened_at` is whole seconds since the unix epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawWorkspaceRecord {
    Local { id: i64, paths: String, opened_at: i64 },
    Remote { id: i64, paths: String, opened_at: i64, remote: RemoteHost },
}

impl RawWorkspaceRecord {
    pub fn id(&self) -> i64 {
        match self {
            Self::Local { id, .. } | Self::Remote { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> WorkspaceKind {
        match self {
            Self::Local { .. } => WorkspaceKind::Local,
            Self::Remote { .. } => WorkspaceKind::Remote,
        }
    }

    pub fn paths_field(&self) -> &str {
        match self {
            Self::Local { paths, .. } | Self::Remote { paths, .. } => paths,
        }
    }

    pub fn opened_at(&self) -> i64 {
        match self {
            Self::Local { opened_at, .. } | Self::Remote { opened_at, .. } => *opened_at,
        }
    }

    /// Individual paths from the comma-joined field, blanks removed.
    pub fn paths(&self) -> Vec<&str> {
        split_paths(self.paths_field())
    }
}

pub(crate) fn split_paths(field: &str) -> Vec<&str> {
    field.split(',').map(str::trim).filter(|path| !path.is_empty()).collect()
}

/// A reconciled workspace, unique by `uri`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalWorkspace {
    /// Identity: `file://<first path>` or `ssh://[user@]host[:port]<first path>`.
    pub uri: String,
    pub title: String,
    pub subtitle: String,
    pub last_opened: i64,
    pub kind: WorkspaceKind,
    /// Store row id, needed to delete the entry.
    pub source_id: i64,
    pub paths: Vec<String>,
}

/// A pinned workspace identity with its explicit display position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedEntry {
    pub uri: String,
    pub order: usize,
    pub kind: WorkspaceKind,
}

/// Outcome of schema version resolution for one database.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaVersionInfo {
    pub version: i64,
    pub supported: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_skip_blank_segments() {
        let record = RawWorkspaceRecord::Local {
            id: 1,
            paths: "/a, ,/b,".into(),
            opened_at: 0,
        };
        assert_eq!(record.paths(), vec!["/a", "/b"]);
    }

    #[test]
    fn record_serializes_with_kind_tag() {
        let record = RawWorkspaceRecord::Remote {
            id: 7,
            paths: "/srv/app".into(),
            opened_at: 10,
            remote: RemoteHost { host: "box".into(), user: None, port: Some(22) },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kind"], "remote");
        assert_eq!(value["remote"]["port"], 22);
        assert_eq!(record.kind(), WorkspaceKind::Remote);
        assert_eq!(record.id(), 7);
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&WorkspaceKind::Local).unwrap(), "\"local\"");
        assert_eq!(WorkspaceKind::Remote.as_str(), "remote");
    }
}
