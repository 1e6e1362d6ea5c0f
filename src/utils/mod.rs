//! Utility functions and helpers.
//!
//! - [`hash`]: Content hashing (xxHash3, bounded streaming)
//! - [`serialization`]: Binary serialization for the snapshot blob
//! - [`thread_pool`]: Thread pool configuration for parallel hashing
//! - Path manipulation (tilde expansion, relative display paths)
//! - Timestamp helpers

/// Content hashing primitives
pub mod hash;
/// Binary serialization utilities
pub mod serialization;
/// Thread pool configuration for parallel operations
pub mod thread_pool;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Expands a path starting with `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path is empty.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        anyhow::bail!("Path cannot be empty");
    }
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Ok(home.join(&path[2..]));
    }
    Ok(PathBuf::from(path))
}

/// Make `path` relative to `base` if possible, otherwise return `path` as is.
///
/// Used for log and report lines so entries read relative to the scan root.
#[must_use]
pub fn display_relative(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

/// Returns the current timestamp as seconds since the Unix epoch.
#[must_use]
pub fn get_current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
