//! Rename matcher: correlates removed entries with added entries by content
//! digest to suggest probable moves.
//!
//! The output is advisory only. A removed entry with candidates is still a
//! removal; the candidates tell the caller where the same content now lives.

use crate::inventory::FileRecord;
use std::collections::HashMap;

/// Match candidates for one removed entry.
#[derive(Debug, Clone)]
pub struct RenameMatch {
    /// The removed entry being reconciled
    pub removed: FileRecord,
    /// Added entries sharing its digest, in the order they were discovered.
    /// Empty when no added entry has the same content (a true deletion) or
    /// when the removed entry's digest was never computed.
    pub candidates: Vec<FileRecord>,
}

impl RenameMatch {
    /// Whether any probable new location was found.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Correlates `removed` entries against `added` entries by digest.
///
/// Builds a digest index over `added` once, so the scan is O(added + removed)
/// rather than a rescan per removed entry. Entries with a deferred digest
/// never match: an unhashed removed entry is reported as a pure deletion even
/// if an added entry is also unhashed. Duplicate content yields multiple
/// candidates; all are reported.
#[must_use]
pub fn find_matches(removed: &[FileRecord], added: &[FileRecord]) -> Vec<RenameMatch> {
    let mut by_hash: HashMap<&str, Vec<&FileRecord>> = HashMap::new();
    for record in added {
        if let Some(hash) = record.hash.as_deref() {
            by_hash.entry(hash).or_default().push(record);
        }
    }

    removed
        .iter()
        .map(|record| {
            let candidates = record
                .hash
                .as_deref()
                .and_then(|hash| by_hash.get(hash))
                .map(|found| found.iter().map(|r| (*r).clone()).collect())
                .unwrap_or_default();

            RenameMatch {
                removed: record.clone(),
                candidates,
            }
        })
        .collect()
}

/// Number of removed entries with at least one candidate.
#[must_use]
pub fn matched_count(matches: &[RenameMatch]) -> usize {
    matches.iter().filter(|m| m.is_matched()).count()
}
