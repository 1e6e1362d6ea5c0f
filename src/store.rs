//! Snapshot store: durable persistence of an inventory between runs.
//!
//! The on-disk format is a zstd-compressed bincode blob. An absent snapshot
//! is not an error (first-run semantics); a snapshot that exists but cannot
//! be decoded is, and the caller must treat it as fatal rather than silently
//! starting over.

use crate::inventory::{INVENTORY_VERSION, Inventory};
use crate::utils::serialization;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use zstd::stream::{decode_all, encode_all};

/// Reads and writes the snapshot file for one scan root.
pub struct SnapshotStore {
    /// Snapshot file location
    path: PathBuf,
    /// Zstd compression level for saves
    compression_level: i32,
}

impl SnapshotStore {
    /// Creates a store for the given snapshot location.
    #[must_use]
    pub fn new(path: PathBuf, compression_level: i32) -> Self {
        Self {
            path,
            compression_level,
        }
    }

    /// Loads the previously persisted inventory.
    ///
    /// Returns `Ok(None)` when no snapshot exists yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, decompressed,
    /// decoded, or carries an incompatible format version.
    pub fn load(&self) -> Result<Option<Inventory>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snapshot found, treating as first run");
            return Ok(None);
        }

        let compressed = fs::read(&self.path)
            .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))?;
        let decompressed = decode_all(&compressed[..])
            .with_context(|| format!("Corrupt snapshot (bad compression): {}", self.path.display()))?;
        let inventory: Inventory = serialization::deserialize(&decompressed)
            .with_context(|| format!("Corrupt snapshot (bad encoding): {}", self.path.display()))?;

        if inventory.version != INVENTORY_VERSION {
            anyhow::bail!(
                "Incompatible snapshot version {} in {} (expected {})",
                inventory.version,
                self.path.display(),
                INVENTORY_VERSION
            );
        }

        debug!(entries = inventory.len(), "loaded snapshot");
        Ok(Some(inventory))
    }

    /// Persists an inventory, replacing any prior snapshot.
    ///
    /// The blob is written to a temporary file in the snapshot's directory
    /// and renamed into place, so a crashed or interrupted run never leaves a
    /// partially written snapshot behind.
    ///
    /// # Errors
    /// Returns an error if serialization, compression, or the write fails.
    pub fn save(&self, inventory: &Inventory) -> Result<()> {
        let serialized =
            serialization::serialize(inventory).context("Failed to serialize snapshot")?;
        let compressed = encode_all(&serialized[..], self.compression_level)
            .context("Failed to compress snapshot")?;

        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut tmp = tempfile::NamedTempFile::new_in(parent.unwrap_or_else(|| Path::new(".")))
            .with_context(|| {
                format!(
                    "Failed to create temporary snapshot near: {}",
                    self.path.display()
                )
            })?;
        tmp.write_all(&compressed)
            .context("Failed to write snapshot data")?;
        tmp.flush().context("Failed to flush snapshot data")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace snapshot: {}", self.path.display()))?;

        debug!(entries = inventory.len(), path = %self.path.display(), "saved snapshot");
        Ok(())
    }
}
