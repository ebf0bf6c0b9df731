// Pinned workspaces with an explicit, user-controlled order.
//
// Invariant: for N entries the `order` values are exactly 0..N. Every mutation
// below preserves it; nothing here re-sorts by recency.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{PinnedEntry, WorkspaceKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PinnedEntry>", into = "Vec<PinnedEntry>")]
pub struct PinnedSet {
    entries: BTreeMap<String, PinnedEntry>,
}

impl PinnedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries. Orders are re-densified (stable by
    /// stored order, then URI) and duplicate URIs keep their first position.
    pub fn from_entries(entries: impl IntoIterator<Item = PinnedEntry>) -> Self {
        let mut sorted: Vec<PinnedEntry> = entries.into_iter().collect();
        sorted.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.uri.cmp(&b.uri)));

        let mut set = Self::new();
        for entry in sorted {
            set.pin(entry.uri, entry.kind);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.entries.contains_key(uri)
    }

    pub fn get(&self, uri: &str) -> Option<&PinnedEntry> {
        self.entries.get(uri)
    }

    /// Append `uri` at the end. Returns `false` if it was already pinned.
    pub fn pin(&mut self, uri: impl Into<String>, kind: WorkspaceKind) -> bool {
        let uri = uri.into();
        if self.entries.contains_key(&uri) {
            return false;
        }
        let order = self.entries.len();
        self.entries.insert(uri.clone(), PinnedEntry { uri, order, kind });
        true
    }

    /// Remove `uri` and close the gap it leaves. Returns `false` if it was not
    /// pinned.
    pub fn unpin(&mut self, uri: &str) -> bool {
        let Some(removed) = self.entries.remove(uri) else {
            return false;
        };
        for entry in self.entries.values_mut() {
            if entry.order > removed.order {
                entry.order -= 1;
            }
        }
        true
    }

    pub fn unpin_all(&mut self) {
        self.entries.clear();
    }

    /// Keep only entries matching `keep`, preserving relative order.
    pub fn retain(&mut self, mut keep: impl FnMut(&PinnedEntry) -> bool) {
        let kept: Vec<PinnedEntry> =
            self.ordered().into_iter().filter(|entry| keep(entry)).cloned().collect();
        *self = Self::from_entries(kept);
    }

    pub fn can_move_up(&self, uri: &str) -> bool {
        self.get(uri).is_some_and(|entry| entry.order > 0)
    }

    pub fn can_move_down(&self, uri: &str) -> bool {
        self.get(uri).is_some_and(|entry| entry.order + 1 < self.len())
    }

    /// Swap with the entry above. No-op (returns `false`) at the top or for an
    /// unknown URI.
    pub fn move_up(&mut self, uri: &str) -> bool {
        if !self.can_move_up(uri) {
            return false;
        }
        let order = self.entries[uri].order;
        self.swap_orders(order, order - 1);
        true
    }

    /// Swap with the entry below. No-op (returns `false`) at the bottom or for
    /// an unknown URI.
    pub fn move_down(&mut self, uri: &str) -> bool {
        if !self.can_move_down(uri) {
            return false;
        }
        let order = self.entries[uri].order;
        self.swap_orders(order, order + 1);
        true
    }

    /// Entries by ascending `order`.
    pub fn ordered(&self) -> Vec<&PinnedEntry> {
        let mut ordered: Vec<&PinnedEntry> = self.entries.values().collect();
        ordered.sort_by_key(|entry| entry.order);
        ordered
    }

    fn swap_orders(&mut self, a: usize, b: usize) {
        for entry in self.entries.values_mut() {
            if entry.order == a {
                entry.order = b;
            } else if entry.order == b {
                entry.order = a;
            }
        }
    }
}

impl From<Vec<PinnedEntry>> for PinnedSet {
    fn from(entries: Vec<PinnedEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<PinnedSet> for Vec<PinnedEntry> {
    fn from(set: PinnedSet) -> Self {
        let mut entries: Vec<PinnedEntry> = set.entries.into_values().collect();
        entries.sort_by_key(|entry| entry.order);
        entries
    }
}
