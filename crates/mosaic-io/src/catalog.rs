// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A stable, cached enumeration of the streamed source directory.
//!
//! The directory is walked exactly once. Slot `k` always maps to the `k`-th
//! entry of that walk, so counting and per-index lookups can never disagree
//! even on filesystems whose iteration order changes between calls.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while enumerating the source directory.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured path is missing or not a directory.
    #[error("source directory '{0}' does not exist or is not a directory")]
    NotADirectory(PathBuf),
    /// The walk itself failed.
    #[error("failed to enumerate '{path}'")]
    Walk {
        /// The directory being enumerated.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: walkdir::Error,
    },
}

/// The ordered list of files to stream.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    root: PathBuf,
    entries: Vec<PathBuf>,
}

impl SourceCatalog {
    /// Enumerates the regular files directly inside `dir`, sorted by file name.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = dir.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(CatalogError::NotADirectory(root));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| CatalogError::Walk {
                path: root.clone(),
                source,
            })?;
            if entry.file_type().is_file() {
                entries.push(entry.into_path());
            }
        }

        log::info!(
            "[SourceCatalog] Number of streaming assets in '{}': {}",
            root.display(),
            entries.len()
        );
        Ok(Self { root, entries })
    }

    /// Builds a catalog from an already ordered list of paths.
    pub fn from_entries(root: impl Into<PathBuf>, entries: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    /// Keeps at most the first `max` entries.
    pub fn truncate(&mut self, max: usize) {
        if max < self.entries.len() {
            log::info!(
                "[SourceCatalog] Capping stream from {} to {} assets",
                self.entries.len(),
                max
            );
            self.entries.truncate(max);
        }
    }

    /// The path of the `index`-th entry.
    pub fn path(&self, index: usize) -> Option<&Path> {
        self.entries.get(index).map(PathBuf::as_path)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to stream.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The enumerated directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scan_is_sorted_and_skips_directories() -> anyhow::Result<()> {
        let dir = tempdir()?;
        for name in ["c.png", "a.png", "b.png"] {
            std::fs::write(dir.path().join(name), b"x")?;
        }
        std::fs::create_dir(dir.path().join("nested"))?;
        std::fs::write(dir.path().join("nested").join("deep.png"), b"x")?;

        let catalog = SourceCatalog::scan(dir.path())?;
        let names: Vec<_> = catalog
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
        assert_eq!(catalog.path(1), Some(dir.path().join("b.png").as_path()));
        assert_eq!(catalog.path(3), None);
        Ok(())
    }

    #[test]
    fn lookups_match_the_single_scan() -> anyhow::Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("one.png"), b"x")?;
        let catalog = SourceCatalog::scan(dir.path())?;

        // Files added after the scan do not shift existing indices.
        std::fs::write(dir.path().join("0-early.png"), b"x")?;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.path(0), Some(dir.path().join("one.png").as_path()));
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = SourceCatalog::scan("/definitely/not/here").unwrap_err();
        assert!(matches!(err, CatalogError::NotADirectory(_)));
    }

    #[test]
    fn truncate_caps_length() {
        let mut catalog = SourceCatalog::from_entries(
            "root",
            vec!["a".into(), "b".into(), "c".into()],
        );
        catalog.truncate(2);
        assert_eq!(catalog.len(), 2);
        catalog.truncate(10);
        assert_eq!(catalog.len(), 2);
    }
}
