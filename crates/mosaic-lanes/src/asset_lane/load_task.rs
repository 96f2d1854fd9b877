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

//! The unit of work that turns one catalog entry into one populated slot.

use super::{AssetLoaderLane, BitmapLoaderLane};
use mosaic_core::asset::{AssetHandle, Bitmap};
use mosaic_core::task::{Task, TaskReport};
use mosaic_core::telemetry::MetricsResult;
use mosaic_data::{AssetStore, StoreError};
use mosaic_io::SourceCatalog;
use mosaic_telemetry::{CounterHandle, HistogramHandle, MetricsRegistry, ScopedMetricTimer};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Why a single load failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The catalog has no entry for the target index.
    #[error("no source file for slot {0}")]
    MissingSource(usize),
    /// The source file could not be read.
    #[error("failed to read '{path}'")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The bytes were read but could not be decoded.
    #[error("failed to decode '{path}'")]
    Decode {
        /// The file that was decoded.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Metric handles updated by every [`LoadTask`].
#[derive(Debug, Clone)]
pub struct LoadMetrics {
    decode_time: HistogramHandle,
    loaded: CounterHandle,
    failed: CounterHandle,
}

impl LoadMetrics {
    /// Registers the `assets:*` metrics.
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            decode_time: registry.register_histogram(
                "assets",
                "decode_time",
                "Time spent decoding and resampling one image",
                "ms",
                vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0],
            )?,
            loaded: registry.register_counter(
                "assets",
                "loaded_total",
                "Streamed assets published into the store",
            )?,
            failed: registry.register_counter(
                "assets",
                "failed_total",
                "Streamed asset loads that failed",
            )?,
        })
    }

    /// Handle to the loaded counter.
    pub fn loaded(&self) -> &CounterHandle {
        &self.loaded
    }

    /// Handle to the failed counter.
    pub fn failed(&self) -> &CounterHandle {
        &self.failed
    }
}

/// Loads the catalog entry at `target`, decodes it and publishes it into the
/// store slot of the same index.
///
/// The task never retries and never touches the sequencer; it only reports
/// what happened.
pub struct LoadTask {
    target: usize,
    catalog: Arc<SourceCatalog>,
    store: Arc<AssetStore>,
    lane: BitmapLoaderLane,
    metrics: Option<LoadMetrics>,
}

impl LoadTask {
    /// Creates a task bound to `target`.
    pub fn new(
        target: usize,
        catalog: Arc<SourceCatalog>,
        store: Arc<AssetStore>,
        lane: BitmapLoaderLane,
    ) -> Self {
        Self {
            target,
            catalog,
            store,
            lane,
            metrics: None,
        }
    }

    /// Records decode time and outcome counts into `metrics`.
    pub fn with_metrics(mut self, metrics: LoadMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Runs the load without building a report.
    pub fn run(&self) -> Result<(), LoadError> {
        let path = self
            .catalog
            .path(self.target)
            .ok_or(LoadError::MissingSource(self.target))?;

        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let bitmap = {
            let _timer = self.metrics.as_ref().map(|m| ScopedMetricTimer::new(&m.decode_time));
            self.lane.load(&bytes).map_err(|source| LoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?
        };

        let handle = AssetHandle::new(bitmap);
        self.store.write_slot(self.target, handle.clone())?;

        if let Some(name) = path.file_name() {
            self.store
                .append_named(name.to_string_lossy().into_owned(), handle);
        }
        Ok(())
    }
}

impl Task for LoadTask {
    fn target(&self) -> usize {
        self.target
    }

    fn execute(self: Box<Self>) -> TaskReport {
        match self.run() {
            Ok(()) => {
                if let Some(metrics) = &self.metrics {
                    let _ = metrics.loaded.increment();
                }
                log::trace!("Loaded stream asset #{}", self.target);
                TaskReport::completed(self.target)
            }
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    let _ = metrics.failed.increment();
                }
                let reason = describe(&e);
                log::warn!("Failed to load stream asset #{}: {}", self.target, reason);
                TaskReport::failed(self.target, reason)
            }
        }
    }
}

/// Formats an error with its full source chain.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use mosaic_core::asset::NamedAssetSource;
    use mosaic_core::task::TaskOutcome;
    use tempfile::tempdir;

    fn write_png(dir: &std::path::Path, name: &str, size: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    #[test]
    fn publishes_into_target_slot_and_name_table() {
        let dir = tempdir().unwrap();
        let first = write_png(dir.path(), "a.png", 8);
        let second = write_png(dir.path(), "b.png", 8);
        let catalog = Arc::new(SourceCatalog::from_entries(dir.path(), vec![first, second]));
        let store = Arc::new(AssetStore::with_slots(2));
        let registry = MetricsRegistry::new();
        let metrics = LoadMetrics::register(&registry).unwrap();

        let task = LoadTask::new(1, catalog, store.clone(), BitmapLoaderLane::downsampling(4))
            .with_metrics(metrics.clone());
        let report = Box::new(task).execute();

        assert_eq!(report, TaskReport::completed(1));
        assert!(!store.is_populated(0));
        assert_eq!(store.slot(1).unwrap().size().width, 4);
        assert_eq!(store.count_frames("b.png"), 1);
        assert_eq!(metrics.loaded().get().unwrap(), 1);
    }

    #[test]
    fn unreadable_file_reports_failure() {
        let dir = tempdir().unwrap();
        let catalog = Arc::new(SourceCatalog::from_entries(
            dir.path(),
            vec![dir.path().join("missing.png")],
        ));
        let store = Arc::new(AssetStore::with_slots(1));

        let report = Box::new(LoadTask::new(0, catalog, store.clone(), BitmapLoaderLane::native()))
            .execute();

        assert_eq!(report.target, 0);
        assert!(matches!(report.outcome, TaskOutcome::Failed(ref r) if r.contains("missing.png")));
        assert_eq!(store.populated_count(), 0);
    }

    #[test]
    fn second_write_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 2);
        let catalog = Arc::new(SourceCatalog::from_entries(dir.path(), vec![path]));
        let store = Arc::new(AssetStore::with_slots(1));
        let lane = BitmapLoaderLane::native();

        LoadTask::new(0, catalog.clone(), store.clone(), lane).run().unwrap();
        let err = LoadTask::new(0, catalog, store.clone(), lane).run().unwrap_err();

        assert!(matches!(err, LoadError::Store(StoreError::SlotAlreadyPopulated(0))));
        assert_eq!(store.populated_count(), 1);
    }
}
