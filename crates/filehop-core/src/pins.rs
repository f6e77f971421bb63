//! Pinned items persisted across sessions.

use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;

/// Storage key for the pinned item list.
pub const PINNED_KEY: &str = "filehop.pinned";

/// A path the user pinned to the action menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedItem {
    /// Absolute path.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl PinnedItem {
    /// Create a new pinned item.
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Ordered pinned items, at most one per path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinList(Vec<PinnedItem>);

impl PinList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a path is pinned.
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p.path == path)
    }

    /// Pin `item`, or unpin it when its path is already present.
    ///
    /// Returns `true` when the item is pinned afterwards.
    pub fn toggle(&mut self, item: PinnedItem) -> bool {
        if let Some(pos) = self.0.iter().position(|p| p.path == item.path) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(item);
            true
        }
    }

    /// Unpin `path`. Returns `false` when it was not pinned.
    pub fn remove(&mut self, path: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p.path != path);
        self.0.len() != before
    }

    /// Iterate over pinned items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PinnedItem> {
        self.0.iter()
    }

    /// Number of pinned items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing is pinned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
