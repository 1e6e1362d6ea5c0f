//! Inventory model and builder.
//!
//! An [`Inventory`] is the state of a directory tree at one point in time: a
//! path-sorted sequence of [`FileRecord`] triples (path, base name, content
//! digest). Records start with a deferred digest (`hash: None`) so the
//! structural diff can run before any hashing cost is paid; the hash pass
//! produces a fresh inventory that replaces the deferred one wholesale.

use crate::output::Progress;
use crate::utils::hash;
use crate::utils::thread_pool;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// On-disk inventory format version, bumped on incompatible changes.
pub const INVENTORY_VERSION: u32 = 1;

/// One tracked file: absolute path, base filename, and content digest.
///
/// `name` is always the base filename component of `path`, cached for
/// reporting. `hash` is `None` until the hash pass has run; a deferred hash
/// never participates in comparison or matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute filesystem path
    pub path: PathBuf,
    /// Base filename component of `path`
    pub name: String,
    /// XXH3-128 digest of file content, `None` while not yet computed
    pub hash: Option<String>,
}

impl FileRecord {
    /// Creates a record with a deferred (not yet computed) digest.
    #[must_use]
    pub fn deferred(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        Self {
            path,
            name,
            hash: None,
        }
    }
}

/// A snapshot of (path, name, hash) triples for a directory tree.
///
/// Entries are sorted by path and paths are unique; both are enforced at
/// construction. Inventories are immutable aggregates passed between
/// pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Format version for snapshot compatibility checks
    pub version: u32,
    /// Unix timestamp recorded when this inventory was built
    pub created_at: i64,
    /// Path-sorted file records
    pub entries: Vec<FileRecord>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::empty()
    }
}

impl Inventory {
    /// Creates an empty inventory (first-run semantics: nothing was tracked).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: INVENTORY_VERSION,
            created_at: crate::utils::get_current_timestamp(),
            entries: Vec::new(),
        }
    }

    /// Builds an inventory with deferred hashes from a set of file paths.
    ///
    /// Paths are sorted and deduplicated so entry order is deterministic and
    /// the unique-path invariant holds regardless of traversal order.
    #[must_use]
    pub fn from_files(mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        paths.dedup();

        Self {
            version: INVENTORY_VERSION,
            created_at: crate::utils::get_current_timestamp(),
            entries: paths.into_iter().map(FileRecord::deferred).collect(),
        }
    }

    /// Number of records in this inventory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this inventory has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The set of paths in this inventory, for O(1) membership tests.
    #[must_use]
    pub fn path_set(&self) -> HashSet<&Path> {
        self.entries.iter().map(|r| r.path.as_path()).collect()
    }

    /// Looks up a record by path.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.entries
            .binary_search_by(|r| r.path.as_path().cmp(path))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Runs the content-hash pass over every record, in parallel.
    ///
    /// Returns a fresh inventory (re-sorted by path, so results are
    /// reproducible across runs regardless of worker scheduling) together
    /// with the entries that failed to hash. A file that disappears or
    /// becomes unreadable between traversal and hashing fails only its own
    /// entry: it is logged, excluded from the result, and the pass continues.
    #[must_use]
    pub fn compute_hashes(
        &self,
        chunk_size: usize,
        progress: Option<&Progress>,
    ) -> (Self, Vec<(PathBuf, anyhow::Error)>) {
        let results: Vec<(&FileRecord, anyhow::Result<String>)> = thread_pool::run_in_pool(|| {
            self.entries
                .par_iter()
                .map(|record| {
                    let result = hash::hash_file(&record.path, chunk_size);
                    if let Some(p) = progress {
                        p.inc();
                    }
                    (record, result)
                })
                .collect()
        });

        let mut entries = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();

        for (record, result) in results {
            match result {
                Ok(digest) => entries.push(FileRecord {
                    path: record.path.clone(),
                    name: record.name.clone(),
                    hash: Some(digest),
                }),
                Err(e) => {
                    warn!(path = %record.path.display(), error = %e, "skipping unreadable file");
                    skipped.push((record.path.clone(), e));
                }
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));

        (
            Self {
                version: INVENTORY_VERSION,
                created_at: crate::utils::get_current_timestamp(),
                entries,
            },
            skipped,
        )
    }
}
