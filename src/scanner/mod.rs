//! Filesystem traversal for the scan root.
//!
//! The scanner is a pure collaborator: given a root and an ordered set of
//! directory-name patterns it returns the folder tree to scan, then the flat
//! set of files within those folders. It never follows the snapshot file's
//! directory conventions or touches inventory logic.
//!
//! Pattern semantics: a pattern starting with `!` excludes matching
//! directory names anywhere in the tree; plain patterns are inclusions that
//! constrain which top-level branches of the root are scanned. With no plain
//! patterns, every branch is scanned.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Enumerates folders and files under a scan root.
pub struct Scanner {
    /// Root of the tree to scan
    root: PathBuf,
    /// Ordered include/exclude patterns for directory names
    patterns: Vec<String>,
    /// Whether to follow symbolic links during traversal
    follow_symlinks: bool,
}

impl Scanner {
    /// Creates a scanner for `root` with the given directory-name patterns.
    #[must_use]
    pub const fn new(root: PathBuf, patterns: Vec<String>, follow_symlinks: bool) -> Self {
        Self {
            root,
            patterns,
            follow_symlinks,
        }
    }

    /// Returns every directory to scan, pattern-filtered, root included.
    ///
    /// Excluded directories are pruned, so their subtrees are never visited.
    ///
    /// # Errors
    /// Returns an error if the root does not exist or a directory entry
    /// cannot be read.
    pub fn folders(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            anyhow::bail!("Scan root is not a directory: {}", self.root.display());
        }

        let has_includes = self.patterns.iter().any(|p| !p.starts_with('!'));
        let mut folders = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_entry(|e| self.allows(e, has_includes))
        {
            let entry = entry.with_context(|| {
                format!("Failed to read directory entry in {}", self.root.display())
            })?;

            if entry.file_type().is_dir() {
                folders.push(entry.path().to_path_buf());
            }
        }

        Ok(folders)
    }

    /// Returns the files directly inside each of the given folders.
    ///
    /// The folder list is already recursive, so listing is per-folder and
    /// non-recursive here.
    ///
    /// # Errors
    /// Returns an error if a folder cannot be listed.
    pub fn files_in(&self, folders: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for folder in folders {
            for entry in fs::read_dir(folder)
                .with_context(|| format!("Failed to list folder: {}", folder.display()))?
            {
                let entry = entry?;
                let file_type = entry.file_type()?;
                if file_type.is_file() {
                    files.push(entry.path());
                } else if file_type.is_symlink()
                    && self.follow_symlinks
                    && entry.path().is_file()
                {
                    files.push(entry.path());
                }
            }
        }

        Ok(files)
    }

    /// Convenience: folders then files, in one call.
    ///
    /// # Errors
    /// Returns an error if traversal fails.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let folders = self.folders()?;
        self.files_in(&folders)
    }

    /// Whether a walk entry survives the pattern filter.
    fn allows(&self, entry: &walkdir::DirEntry, has_includes: bool) -> bool {
        if !entry.file_type().is_dir() || entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();

        for pattern in &self.patterns {
            if let Some(excluded) = pattern.strip_prefix('!')
                && matches_pattern(&name, excluded)
            {
                return false;
            }
        }

        // Inclusions constrain the top-level branches only
        if has_includes && entry.depth() == 1 {
            return self
                .patterns
                .iter()
                .filter(|p| !p.starts_with('!'))
                .any(|p| matches_pattern(&name, p));
        }

        true
    }
}

/// Glob-style match of a directory name against one pattern.
///
/// Supports `name`, `*suffix`, `prefix*`, and `*contains*` forms.
#[must_use]
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    if pattern.starts_with('*') && pattern.ends_with('*') && pattern.len() >= 2 {
        let search = &pattern[1..pattern.len() - 1];
        name.contains(search)
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        name.ends_with(suffix)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        name.starts_with(prefix)
    } else {
        name == pattern
    }
}
