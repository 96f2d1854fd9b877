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

//! The shared destination for decoded assets.

use mosaic_core::asset::{AssetHandle, Bitmap, NamedAssetSource};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError, RwLock};
use thiserror::Error;

/// Errors raised by [`AssetStore`] writes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The index is past the preallocated slot count.
    #[error("slot {index} is out of range (store has {len} slots)")]
    SlotOutOfRange {
        /// The rejected index.
        index: usize,
        /// The preallocated slot count.
        len: usize,
    },
    /// The slot was already written. The first asset is kept.
    #[error("slot {0} is already populated")]
    SlotAlreadyPopulated(usize),
    /// `preallocate` was called a second time.
    #[error("store is already preallocated with {0} slots")]
    AlreadyPreallocated(usize),
}

/// A thread-safe asset store made of two parts.
///
/// - A fixed-size slot array, one slot per streamed asset. Each slot goes from
///   empty to populated exactly once and never back, so the populated count only
///   grows. Workers write distinct slots concurrently without a lock.
/// - A name-keyed, append-only table of frames for assets resolved outside the
///   streaming batch (backgrounds, animation frames).
///
/// The store is built once, wrapped in an `Arc` and shared with the workers and
/// the sequencer for the lifetime of a run.
#[derive(Debug, Default)]
pub struct AssetStore {
    slots: Vec<OnceLock<AssetHandle<Bitmap>>>,
    preallocated: bool,
    populated: AtomicUsize,
    named: RwLock<HashMap<String, Vec<AssetHandle<Bitmap>>>>,
    reported_misses: Mutex<HashSet<String>>,
}

impl AssetStore {
    /// Creates a store with no slots. Call [`preallocate`](Self::preallocate)
    /// before sharing it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `count` empty slots.
    pub fn with_slots(count: usize) -> Self {
        let mut store = Self::new();
        store.allocate(count);
        store
    }

    /// Fixes the slot count to `count`, all initially empty.
    ///
    /// Taking `&mut self` means this can only happen before the store is shared.
    pub fn preallocate(&mut self, count: usize) -> Result<(), StoreError> {
        if self.preallocated {
            return Err(StoreError::AlreadyPreallocated(self.slots.len()));
        }
        self.allocate(count);
        Ok(())
    }

    fn allocate(&mut self, count: usize) {
        self.slots = (0..count).map(|_| OnceLock::new()).collect();
        self.preallocated = true;
        log::info!("[AssetStore] Pre-allocated {} stream slots", count);
    }

    /// Publishes `asset` into slot `index`.
    ///
    /// Safe to call concurrently for distinct indices. A second write to the same
    /// index is rejected and leaves the first asset in place.
    pub fn write_slot(&self, index: usize, asset: AssetHandle<Bitmap>) -> Result<(), StoreError> {
        let slot = self.slots.get(index).ok_or(StoreError::SlotOutOfRange {
            index,
            len: self.slots.len(),
        })?;
        slot.set(asset)
            .map_err(|_| StoreError::SlotAlreadyPopulated(index))?;
        // Incremented only after the slot is visible, so readers may see a
        // stale-low count but never a count ahead of the slots.
        self.populated.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// The asset in slot `index`, if populated.
    pub fn slot(&self, index: usize) -> Option<AssetHandle<Bitmap>> {
        self.slots.get(index).and_then(|slot| slot.get()).cloned()
    }

    /// Whether slot `index` holds an asset.
    pub fn is_populated(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of populated slots. Never decreases.
    pub fn populated_count(&self) -> usize {
        self.populated.load(Ordering::Acquire)
    }

    /// Number of preallocated slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Appends a frame under `name`.
    pub fn append_named(&self, name: impl Into<String>, asset: AssetHandle<Bitmap>) {
        let mut named = self.named.write().unwrap_or_else(PoisonError::into_inner);
        named.entry(name.into()).or_default().push(asset);
    }

    /// Number of distinct names registered.
    pub fn named_count(&self) -> usize {
        self.named
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn report_miss(&self, name: &str) {
        let mut misses = self
            .reported_misses
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if misses.insert(name.to_string()) {
            log::warn!("[AssetStore] No asset found for '{}'", name);
        }
    }
}

impl NamedAssetSource for AssetStore {
    fn lookup_named(&self, name: &str, frame_index: usize) -> Option<AssetHandle<Bitmap>> {
        let found = self
            .named
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .and_then(|frames| frames.get(frame_index))
            .cloned();
        if found.is_none() {
            self.report_miss(name);
        }
        found
    }

    fn count_frames(&self, name: &str) -> usize {
        let count = self
            .named
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, Vec::len);
        if count == 0 {
            self.report_miss(name);
        }
        count
    }
}
