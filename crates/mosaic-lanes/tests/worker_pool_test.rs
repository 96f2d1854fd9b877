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

use image::{Rgba, RgbaImage};
use mosaic_core::task::{Task, TaskOutcome, TaskReport};
use mosaic_data::AssetStore;
use mosaic_io::SourceCatalog;
use mosaic_lanes::asset_lane::{BitmapLoaderLane, LoadTask};
use mosaic_lanes::worker_lane::{completion_channel, WorkerPool};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn write_images(dir: &Path, count: usize) {
    for i in 0..count {
        RgbaImage::from_pixel(16, 16, Rgba([i as u8, 0, 0, 255]))
            .save(dir.join(format!("icon_{i:03}.png")))
            .unwrap();
    }
}

#[test]
fn every_scheduled_slot_is_populated_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path(), 24);
    let catalog = Arc::new(SourceCatalog::scan(dir.path()).unwrap());
    let store = Arc::new(AssetStore::with_slots(catalog.len()));
    let (listener, completions) = completion_channel();
    let mut pool = WorkerPool::new(listener);
    pool.start(4).unwrap();

    for i in 0..catalog.len() {
        let task = LoadTask::new(
            i,
            catalog.clone(),
            store.clone(),
            BitmapLoaderLane::downsampling(8),
        );
        pool.schedule(Box::new(task)).unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut last = 0;
    let mut reports = Vec::new();
    while reports.len() < catalog.len() && Instant::now() < deadline {
        let populated = store.populated_count();
        assert!(populated >= last, "populated count went backwards");
        assert!(populated <= store.slot_count());
        last = populated;
        if let Ok(report) = completions.recv_timeout(Duration::from_millis(50)) {
            reports.push(report);
        }
    }
    pool.shutdown();

    assert_eq!(reports.len(), 24);
    assert!(reports.iter().all(|r| r.outcome.is_completed()));
    let targets: HashSet<usize> = reports.iter().map(|r| r.target).collect();
    assert_eq!(targets.len(), 24);
    assert_eq!(store.populated_count(), 24);
    assert_eq!(store.slot(5).unwrap().pixel(0, 0), Some([5, 0, 0, 255]));
}

#[test]
fn decode_failure_still_reports_completion() {
    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path(), 2);
    std::fs::write(dir.path().join("icon_001.png"), b"corrupt").unwrap();
    let catalog = Arc::new(SourceCatalog::scan(dir.path()).unwrap());
    let store = Arc::new(AssetStore::with_slots(catalog.len()));
    let (listener, completions) = completion_channel();
    let mut pool = WorkerPool::new(listener);
    pool.start(2).unwrap();

    for i in 0..2 {
        let task = LoadTask::new(i, catalog.clone(), store.clone(), BitmapLoaderLane::native());
        pool.schedule(Box::new(task)).unwrap();
    }
    pool.shutdown();

    let mut reports: Vec<TaskReport> = completions.try_iter().collect();
    reports.sort_by_key(|r| r.target);
    assert_eq!(reports.len(), 2);
    assert!(reports[0].outcome.is_completed());
    assert!(matches!(reports[1].outcome, TaskOutcome::Failed(_)));
    assert!(store.is_populated(0));
    assert!(!store.is_populated(1));
}

struct Explode(usize);

impl Task for Explode {
    fn target(&self) -> usize {
        self.0
    }

    fn execute(self: Box<Self>) -> TaskReport {
        panic!("boom");
    }
}

#[test]
fn panicking_task_is_reported_and_worker_survives() {
    let (listener, completions) = completion_channel();
    let mut pool = WorkerPool::new(listener);
    pool.start(1).unwrap();

    pool.schedule(Box::new(Explode(7))).unwrap();
    pool.schedule(Box::new(Explode(8))).unwrap();
    pool.shutdown();

    let reports: Vec<TaskReport> = completions.try_iter().collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0], TaskReport::failed(7, "task panicked"));
    assert_eq!(reports[1].target, 8);
}
