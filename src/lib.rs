#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)] // Simple counters and size calculations cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Driftwatch - Directory-Tree Integrity Tracker
//!
//! Driftwatch tracks the contents of a directory tree over time and tells
//! accidental deletions apart from moves and renames. Each run builds an
//! inventory of (path, name, content-digest) triples, diffs it against the
//! snapshot persisted by the previous run, and reconciles removed entries
//! with added entries by digest: same content in a new place is a probable
//! move, content gone entirely is a probable deletion.
//!
//! ## Features
//!
//! - **Content identity**: Files are identified by xxHash3 digests, so a
//!   rename or reorganization never reads as data loss
//! - **Parallel hashing**: Uses Rayon for the hash pass, with bounded
//!   streaming reads so memory stays independent of file size
//! - **Binary snapshots**: Compact bincode + zstd snapshot files, replaced
//!   atomically so an interrupted run never corrupts the previous state
//! - **Advisory matching**: Every removed entry reports all added entries
//!   sharing its digest, none is silently dropped
//!
//! ## Architecture
//!
//! - [`inventory`]: Inventory model and builder (deferred vs. computed hashes)
//! - [`diff`]: Path-identity set difference between two inventories
//! - [`matcher`]: Digest-based rename/move reconciliation
//! - [`store`]: Snapshot persistence (load/save, corruption detection)
//! - [`pipeline`]: The run orchestrator tying the stages together
//! - [`scanner`]: Filesystem traversal with directory-name patterns
//! - [`config`]: Configuration parsing and defaults
//! - [`output`]: Terminal output, styling, and progress display
//! - [`utils`]: Hashing, serialization, and path helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use driftwatch::{DriftwatchContext, pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = DriftwatchContext::new(Some("/data/photos".into()), None)?;
//! let outcome = pipeline::run(&ctx, &pipeline::RunOptions::default())?;
//! if outcome.report.deletions_found() {
//!     for m in outcome.report.matches.iter().filter(|m| m.is_matched()) {
//!         println!("{} probably moved", m.removed.path.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Configuration parsing, validation, and defaults.
pub mod config;

/// Diff engine: added/removed partition of two inventories.
pub mod diff;

/// Inventory model and builder.
pub mod inventory;

/// Rename/move reconciliation by content digest.
pub mod matcher;

/// Output formatting and progress display.
pub mod output;

/// Run orchestrator.
pub mod pipeline;

/// Filesystem scanning and directory traversal.
pub mod scanner;

/// Snapshot persistence.
pub mod store;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Current version of the driftwatch binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path relative to home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/driftwatch/config.toml";

/// Central context for one scan target.
///
/// Holds the resolved scan root, the snapshot location, and the loaded
/// configuration. Commands and the pipeline take this by reference; nothing
/// in the core mutates it.
#[derive(Debug, Clone)]
pub struct DriftwatchContext {
    /// Root of the directory tree being tracked.
    pub root: PathBuf,

    /// Location of the snapshot file for this root.
    pub snapshot_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl DriftwatchContext {
    /// Creates a context from the configuration file, with optional
    /// command-line overrides for the scan root and snapshot location.
    ///
    /// The config path comes from `DRIFTWATCH_CONFIG_PATH` when set,
    /// otherwise [`DEFAULT_CONFIG_PATH`] under the home directory. The scan
    /// root falls back to `[scan] root` from the config, then the current
    /// directory, and is canonicalized so inventory paths are absolute.
    /// Paths taken from the config file get `~` expanded first.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined, the
    /// configuration cannot be read or created, or the root cannot be
    /// resolved.
    pub fn new(root: Option<PathBuf>, snapshot_path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Ok(path) = std::env::var("DRIFTWATCH_CONFIG_PATH") {
            PathBuf::from(path)
        } else {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(DEFAULT_CONFIG_PATH)
        };

        let config = config::Config::load(&config_path)?;

        if let Err(e) = utils::thread_pool::configure_from_config(&config) {
            eprintln!("Warning: Failed to configure thread pool: {e}");
        }

        // Config-sourced paths may use `~`; command-line paths arrive
        // shell-expanded already.
        let root = match root {
            Some(path) => path,
            None => match &config.scan.root {
                Some(path) => utils::expand_tilde(&path.to_string_lossy())?,
                None => std::env::current_dir().context("Could not determine current directory")?,
            },
        };
        let root = std::fs::canonicalize(&root)
            .with_context(|| format!("Could not resolve scan root: {}", root.display()))?;

        let snapshot_path = match snapshot_path {
            Some(path) => path,
            None => utils::expand_tilde(&config.core.snapshot_path.to_string_lossy())?,
        };

        Ok(Self {
            root,
            snapshot_path,
            config,
        })
    }

    /// Creates a context with explicit paths and configuration, for
    /// embedding and tests. No canonicalization or config I/O happens.
    #[must_use]
    pub const fn with_config(
        root: PathBuf,
        snapshot_path: PathBuf,
        config: config::Config,
    ) -> Self {
        Self {
            root,
            snapshot_path,
            config,
        }
    }
}
