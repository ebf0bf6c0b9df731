// Reconciliation: fold raw store rows into one canonical workspace per
// identity URI, keeping the most recently opened row.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::identity::{display_name, local_uri, remote_authority, remote_uri};
use crate::types::{CanonicalWorkspace, RawWorkspaceRecord, WorkspaceKind};

/// Reconciled workspaces keyed by identity URI.
pub type WorkspaceMap = BTreeMap<String, CanonicalWorkspace>;

impl CanonicalWorkspace {
    /// Build the canonical form of one record. `None` when no identity URI can
    /// be derived from it.
    pub fn from_record(record: &RawWorkspaceRecord) -> Option<Self> {
        let paths: Vec<String> = record.paths().into_iter().map(str::to_string).collect();
        let first = paths.first()?;

        let (uri, subtitle) = match record {
            RawWorkspaceRecord::Local { .. } => (local_uri(first)?, paths.join(", ")),
            RawWorkspaceRecord::Remote { remote, .. } => {
                (remote_uri(remote, first)?, remote_authority(remote))
            }
        };

        let title = paths.iter().map(|path| display_name(path)).collect::<Vec<_>>().join(", ");

        Some(Self {
            uri,
            title,
            subtitle,
            last_opened: record.opened_at(),
            kind: record.kind(),
            source_id: record.id(),
            paths,
        })
    }

    /// Local folder for local workspaces.
    pub fn local_path(&self) -> Option<&str> {
        match self.kind {
            WorkspaceKind::Local => self.paths.first().map(String::as_str),
            WorkspaceKind::Remote => None,
        }
    }
}

/// Fold `records` left to right. A later record replaces an earlier one with
/// the same URI only when strictly more recent, so ties keep the first seen.
pub fn reconcile<'a>(records: impl IntoIterator<Item = &'a RawWorkspaceRecord>) -> WorkspaceMap {
    let mut workspaces = WorkspaceMap::new();

    for candidate in records.into_iter().filter_map(CanonicalWorkspace::from_record) {
        match workspaces.entry(candidate.uri.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if candidate.last_opened > slot.get().last_opened {
                    slot.insert(candidate);
                }
            }
        }
    }

    workspaces
}

/// Presentation order: most recently opened first, URI as tiebreaker.
pub fn recent_first(workspaces: &WorkspaceMap) -> Vec<&CanonicalWorkspace> {
    let mut ordered: Vec<&CanonicalWorkspace> = workspaces.values().collect();
    ordered.sort_by(|a, b| b.last_opened.cmp(&a.last_opened).then_with(|| a.uri.cmp(&b.uri)));
    ordered
}
