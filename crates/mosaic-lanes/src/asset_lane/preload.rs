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

//! Synchronous loading of the named assets listed in a manifest.

use super::{AssetLoaderLane, BitmapLoaderLane};
use mosaic_core::asset::AssetHandle;
use mosaic_data::AssetStore;
use mosaic_io::AssetManifest;

/// Outcome counts of a [`preload_manifest`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    /// Entries decoded and registered.
    pub loaded: usize,
    /// Entries skipped because they could not be read or decoded.
    pub failed: usize,
}

/// Decodes every manifest entry on the calling thread and appends it to the
/// store's named table under its key.
///
/// Failures are logged and skipped. Runs before streaming starts.
pub fn preload_manifest(
    store: &AssetStore,
    manifest: &AssetManifest,
    lane: &BitmapLoaderLane,
) -> PreloadSummary {
    let mut summary = PreloadSummary::default();

    for entry in manifest.entries() {
        let decoded = std::fs::read(&entry.path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| lane.load(&bytes).map_err(|e| e.to_string()));

        match decoded {
            Ok(bitmap) => {
                log::debug!("Preloaded '{}' from {}", entry.name, entry.path.display());
                store.append_named(entry.name.clone(), AssetHandle::new(bitmap));
                summary.loaded += 1;
            }
            Err(reason) => {
                log::warn!(
                    "Failed to preload '{}' from {}: {}",
                    entry.name,
                    entry.path.display(),
                    reason
                );
                summary.failed += 1;
            }
        }
    }

    log::info!(
        "Preloaded {} named assets under {} names ({} failed)",
        summary.loaded,
        store.named_count(),
        summary.failed
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use mosaic_core::asset::NamedAssetSource;
    use tempfile::tempdir;

    #[test]
    fn frames_accumulate_under_one_key() {
        let dir = tempdir().unwrap();
        for name in ["bg1.png", "walk.0.png", "walk.1.png"] {
            RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]))
                .save(dir.path().join(name))
                .unwrap();
        }
        let manifest = AssetManifest::parse(
            "bg1.png\nwalk.0.png\n\nwalk.1.png\nnope.png\n",
            dir.path(),
        );
        let store = AssetStore::new();

        let summary = preload_manifest(&store, &manifest, &BitmapLoaderLane::native());

        assert_eq!(summary, PreloadSummary { loaded: 3, failed: 1 });
        assert_eq!(store.count_frames("bg1"), 1);
        assert_eq!(store.count_frames("walk"), 2);
        assert_eq!(store.count_frames("nope"), 0);
    }
}
