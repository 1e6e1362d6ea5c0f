use crate::utils::hash::DEFAULT_CHUNK_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Snapshot location and compression settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Scan root and traversal settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Parallelism and I/O tuning
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Snapshot storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Where the snapshot of the previous run is kept
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Zstd compression level for snapshot writes
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,
}

/// Traversal settings for the scan root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Default scan root when none is given on the command line
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Ordered directory-name patterns; `!`-prefixed patterns exclude
    #[serde(default)]
    pub folder_patterns: Vec<String>,
    /// Whether traversal follows symbolic links
    #[serde(default)]
    pub follow_symlinks: bool,
}

/// Parallelism and I/O tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Worker threads for the parallel hash pass
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,
    /// Read-chunk size for streaming large files through the hasher
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            compression_level: default_compression_level(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: None,
            folder_patterns: Vec::new(),
            follow_symlinks: false,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file is created with defaults so first runs work without
    /// any manual setup.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot read or parse the configuration file
    /// - Configuration file contains invalid TOML
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }
}

// Default functions for serde
fn default_snapshot_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    home.join(".driftwatch").join("snapshot.bin")
}

const fn default_compression_level() -> i32 {
    3
}

fn default_parallel_threads() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
        .min(8)
}

const fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.performance.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.scan.folder_patterns.is_empty());
        assert!(!config.scan.follow_symlinks);
    }

    #[test]
    fn test_load_creates_default_config() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");

        let config = Config::load(&path)?;
        assert!(path.exists());
        assert_eq!(config.core.compression_level, 3);
        Ok(())
    }

    #[test]
    fn test_save_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.scan.root = Some(PathBuf::from("/data/photos"));
        config.scan.folder_patterns = vec!["photos".to_string(), "!.cache".to_string()];
        config.performance.chunk_size = 4096;
        config.save(&path)?;

        let loaded = Config::load(&path)?;
        assert_eq!(loaded.scan.root, Some(PathBuf::from("/data/photos")));
        assert_eq!(loaded.scan.folder_patterns.len(), 2);
        assert_eq!(loaded.performance.chunk_size, 4096);
        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scan]\nfollow_symlinks = true\n")?;

        let config = Config::load(&path)?;
        assert!(config.scan.follow_symlinks);
        assert_eq!(config.performance.chunk_size, DEFAULT_CHUNK_SIZE);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not [ toml")?;

        assert!(Config::load(&path).is_err());
        Ok(())
    }
}
