//! Run orchestrator: sequences the scan pipeline and aggregates the result.
//!
//! One run is a linear pass with explicit data threaded between stages:
//! load previous snapshot, build the current inventory, diff by path, hash,
//! match removed against added by digest, then optionally persist. No stage
//! holds state across calls, and nothing here prompts or prints; callers get
//! a [`RunOutcome`] and decide what to show.
//!
//! Concurrent runs against the same snapshot file are not coordinated here;
//! ensuring at most one run per root/snapshot pair is the caller's job.

use crate::DriftwatchContext;
use crate::diff;
use crate::inventory::{FileRecord, Inventory};
use crate::matcher::{self, RenameMatch};
use crate::output;
use crate::scanner::Scanner;
use crate::store::SnapshotStore;
use crate::utils::display_relative;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Per-run switches, resolved by the caller from CLI flags and config.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Whether to replace the snapshot after this run. When false, the
    /// prior snapshot stays authoritative for the next run.
    pub update_snapshot: bool,
    /// Whether to show a progress counter during the hash pass.
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            update_snapshot: true,
            show_progress: false,
        }
    }
}

/// Everything one run found, for the caller to log or display.
#[derive(Debug)]
pub struct RunReport {
    /// Files in the current inventory after the hash pass
    pub scanned: usize,
    /// Entries present now but absent from the previous snapshot
    pub added: Vec<FileRecord>,
    /// Entries present in the previous snapshot but gone now
    pub removed: Vec<FileRecord>,
    /// Digest-based reconciliation of removed against added, advisory only
    pub matches: Vec<RenameMatch>,
    /// Files dropped because their content could not be read; never part of
    /// the saved snapshot and counted separately from `removed`
    pub skipped: Vec<PathBuf>,
}

impl RunReport {
    /// True when any entry was classified as removed. This is the sole
    /// boolean result of a run; probable moves do not suppress it.
    #[must_use]
    pub fn deletions_found(&self) -> bool {
        !self.removed.is_empty()
    }

    /// Number of removed entries with at least one probable new location.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        matcher::matched_count(&self.matches)
    }
}

/// Result of a run: the report, plus a persistence failure if one occurred.
///
/// A failed `Persist` does not invalidate the report; the caller must be
/// able to tell "run succeeded, persistence failed" apart from full success.
#[derive(Debug)]
pub struct RunOutcome {
    /// The added/removed/matched report
    pub report: RunReport,
    /// Set when the snapshot could not be written
    pub persist_error: Option<anyhow::Error>,
}

/// Executes one scan run over the context's root.
///
/// # Errors
/// Returns an error if the previous snapshot exists but cannot be parsed
/// (corruption is fatal, never silently treated as a first run) or if
/// traversal of the scan root fails. Per-file hash failures and persistence
/// failures are reported through [`RunReport::skipped`] and
/// [`RunOutcome::persist_error`] instead.
pub fn run(ctx: &DriftwatchContext, options: &RunOptions) -> Result<RunOutcome> {
    info!(
        root = %ctx.root.display(),
        snapshot = %ctx.snapshot_path.display(),
        patterns = ?ctx.config.scan.folder_patterns,
        "starting scan"
    );

    let store = SnapshotStore::new(ctx.snapshot_path.clone(), ctx.config.core.compression_level);

    // LoadPrevious: absent means first run; unreadable means stop.
    let loaded = store
        .load()
        .context("Failed to load previous snapshot")?
        .unwrap_or_else(Inventory::empty);
    info!(entries = loaded.len(), "previous inventory loaded");

    // BuildCurrent with deferred hashes; the structural diff needs paths only.
    let scanner = Scanner::new(
        ctx.root.clone(),
        ctx.config.scan.folder_patterns.clone(),
        ctx.config.scan.follow_symlinks,
    );
    let files = scanner.scan().context("Failed to scan directory tree")?;
    let current = Inventory::from_files(files);
    info!(entries = current.len(), "current tree enumerated");

    let diff = diff::diff(&current, &loaded);

    // Hash pass over the whole current inventory, exactly once per file.
    // The hashed inventory replaces the deferred one wholesale and serves
    // both matching and persistence.
    let progress = options
        .show_progress
        .then(|| output::start_progress("Hashing files", current.len()));
    let (current, hash_failures) =
        current.compute_hashes(ctx.config.performance.chunk_size, progress.as_ref());
    if let Some(progress) = progress {
        progress.finish();
    }

    // Re-derive added from the hashed inventory; entries that failed to
    // hash drop out here as well.
    let added: Vec<FileRecord> = diff
        .added
        .iter()
        .filter_map(|record| current.get(&record.path).cloned())
        .collect();
    let removed = diff.removed;

    for record in &added {
        info!(
            digest = record.hash.as_deref().unwrap_or("-"),
            path = %display_relative(&record.path, &ctx.root).display(),
            "file added"
        );
    }
    for record in &removed {
        warn!(
            digest = record.hash.as_deref().unwrap_or("-"),
            path = %display_relative(&record.path, &ctx.root).display(),
            "file deleted"
        );
    }

    let matches = matcher::find_matches(&removed, &added);
    for result in matches.iter().filter(|m| m.is_matched()) {
        let total = result.candidates.len();
        for (idx, candidate) in result.candidates.iter().enumerate() {
            info!(
                lost = %display_relative(&result.removed.path, &ctx.root).display(),
                found = %display_relative(&candidate.path, &ctx.root).display(),
                candidate = idx + 1,
                of = total,
                "probably moved"
            );
        }
    }

    let report = RunReport {
        scanned: current.len(),
        added,
        removed,
        matches,
        skipped: hash_failures.into_iter().map(|(path, _)| path).collect(),
    };

    info!(
        scanned = report.scanned,
        added = report.added.len(),
        removed = report.removed.len(),
        matched = report.matched_count(),
        skipped = report.skipped.len(),
        "scan summary"
    );

    // Persist only after the full hash pass; a failure here is surfaced
    // separately, the report above stays valid.
    let persist_error = if options.update_snapshot {
        store.save(&current).err()
    } else {
        None
    };

    Ok(RunOutcome {
        report,
        persist_error,
    })
}
