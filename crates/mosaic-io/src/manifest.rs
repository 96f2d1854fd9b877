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

//! The named-asset manifest.
//!
//! A text file with one relative path per line. Each path becomes a named asset
//! keyed by its base name: directories and everything from the first `.` of the
//! file name are stripped, so `Media/UI/pokeball1.png` is keyed `pokeball1`.
//! Lines sharing a key become successive frames of that key.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read asset manifest '{path}'")]
    Read {
        /// The manifest path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// The lookup key.
    pub name: String,
    /// The file to load, resolved against the manifest's base directory.
    pub path: PathBuf,
}

/// The parsed manifest, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    entries: Vec<ManifestEntry>,
}

/// Derives the lookup key of a manifest line.
///
/// Returns `None` for lines with no file name.
///
/// # Examples
///
/// ```
/// use mosaic_io::asset_key;
/// assert_eq!(asset_key("Media/UI/bg1.png").as_deref(), Some("bg1"));
/// assert_eq!(asset_key("frames\\loading.02.png").as_deref(), Some("loading"));
/// assert_eq!(asset_key("Media/"), None);
/// ```
pub fn asset_key(line: &str) -> Option<String> {
    let file = line.rsplit(['/', '\\']).next()?;
    let stem = file.split('.').next()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

impl AssetManifest {
    /// Parses manifest text. Relative paths are joined onto `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match asset_key(line) {
                Some(name) => Some(ManifestEntry {
                    name,
                    path: base_dir.join(line),
                }),
                None => {
                    log::warn!("[AssetManifest] Skipping line without a file name: '{}'", line);
                    None
                }
            })
            .collect();
        Self { entries }
    }

    /// Reads and parses the manifest at `path`.
    ///
    /// Listed paths are taken as written, relative to the working directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        Self::load_relative_to(path, Path::new(""))
    }

    /// Reads and parses the manifest at `path`, resolving entries against `base_dir`.
    pub fn load_relative_to(
        path: impl AsRef<Path>,
        base_dir: &Path,
    ) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        log::info!("[AssetManifest] Reading from asset list '{}'", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text, base_dir))
    }

    /// Entries in manifest order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest lists nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_skips_blank_lines_and_keeps_order() {
        let manifest = AssetManifest::parse(
            "Media/bg1.png\r\n\n  Media/loading/loading.1.png \nMedia/loading/loading.2.png\n",
            Path::new("root"),
        );
        let names: Vec<_> = manifest.entries().iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["bg1", "loading", "loading"]);
        assert_eq!(manifest.entries()[0].path, Path::new("root").join("Media/bg1.png"));
    }

    #[test]
    fn load_resolves_against_base_dir() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let media = dir.path().join("Media");
        std::fs::create_dir(&media)?;
        std::fs::write(media.join("assets.txt"), "Media/bg2.png\n")?;

        let manifest = AssetManifest::load_relative_to(media.join("assets.txt"), dir.path())?;
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0].path, dir.path().join("Media/bg2.png"));
        Ok(())
    }

    #[test]
    fn missing_manifest_is_an_error() {
        assert!(AssetManifest::load("/nope/assets.txt").is_err());
    }
}
