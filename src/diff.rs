//! Diff engine: path-identity set difference between two inventories.
//!
//! A path present in both inventories with a changed digest is invisible to
//! this diff (neither added nor removed). That is a deliberate scope
//! boundary: driftwatch tracks add/remove/move, not in-place modification.

use crate::inventory::{FileRecord, Inventory};

/// Partition of the difference between a current and a loaded inventory.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Entries present in current but absent (by path) from loaded
    pub added: Vec<FileRecord>,
    /// Entries present in loaded but absent (by path) from current
    pub removed: Vec<FileRecord>,
}

impl DiffResult {
    /// Whether both sets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes the added/removed partition of `current` against `loaded`.
///
/// Only paths are consulted; no hashes are required at this stage.
/// Membership tests are hash-set backed so inventories with tens of
/// thousands of entries stay linear overall.
#[must_use]
pub fn diff(current: &Inventory, loaded: &Inventory) -> DiffResult {
    let loaded_paths = loaded.path_set();
    let current_paths = current.path_set();

    let added = current
        .entries
        .iter()
        .filter(|r| !loaded_paths.contains(r.path.as_path()))
        .cloned()
        .collect();

    let removed = loaded
        .entries
        .iter()
        .filter(|r| !current_paths.contains(r.path.as_path()))
        .cloned()
        .collect();

    DiffResult { added, removed }
}
