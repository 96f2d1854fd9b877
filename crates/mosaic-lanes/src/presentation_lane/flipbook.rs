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

//! Frame-by-frame playback over a list of bitmaps.

use mosaic_core::asset::{AssetHandle, Bitmap, NamedAssetSource};

/// What happens after the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Wrap back to the first frame.
    Loop,
    /// Stop and mark the playback finished.
    Once,
}

/// A fixed-rate frame sequencer.
#[derive(Debug, Clone)]
pub struct Flipbook {
    frames: Vec<AssetHandle<Bitmap>>,
    frame_secs: f32,
    elapsed: f32,
    current: usize,
    mode: PlayMode,
    finished: bool,
}

impl Flipbook {
    /// An empty flipbook advancing every `frame_secs`.
    pub fn new(frame_secs: f32, mode: PlayMode) -> Self {
        Self {
            frames: Vec::new(),
            frame_secs,
            elapsed: 0.0,
            current: 0,
            mode,
            finished: false,
        }
    }

    /// Appends every frame registered under `name`.
    pub fn load_sequence(&mut self, assets: &dyn NamedAssetSource, name: &str) {
        let count = assets.count_frames(name);
        self.frames
            .extend((0..count).filter_map(|i| assets.lookup_named(name, i)));
    }

    /// Appends the first frame of each of `<prefix>1` to `<prefix><count>`.
    pub fn load_numbered(&mut self, assets: &dyn NamedAssetSource, prefix: &str, count: usize) {
        for i in 1..=count {
            if let Some(frame) = assets.lookup_named(&format!("{prefix}{i}"), 0) {
                self.frames.push(frame);
            }
        }
    }

    /// Advances playback. Returns `true` on the call that finishes a one-shot
    /// playback.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        if self.finished || self.frames.is_empty() {
            return false;
        }

        self.elapsed += delta_seconds;
        if self.elapsed < self.frame_secs {
            return false;
        }
        self.elapsed = 0.0;
        self.current += 1;

        if self.current < self.frames.len() {
            return false;
        }
        match self.mode {
            PlayMode::Loop => {
                self.current = 0;
                false
            }
            PlayMode::Once => {
                self.current = self.frames.len() - 1;
                self.finished = true;
                true
            }
        }
    }

    /// The frame to draw, if any were loaded.
    pub fn current_frame(&self) -> Option<&AssetHandle<Bitmap>> {
        self.frames.get(self.current)
    }

    /// Index of the frame to draw.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of loaded frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether a one-shot playback reached its end.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mosaic_data::AssetStore;

    pub(crate) fn frames(store: &AssetStore, name: &str, count: usize) {
        for _ in 0..count {
            let bitmap = Bitmap::from_rgba8(1, 1, vec![0; 4]).unwrap();
            store.append_named(name, AssetHandle::new(bitmap));
        }
    }

    #[test]
    fn once_stops_on_last_frame() {
        let store = AssetStore::new();
        frames(&store, "walk", 3);
        let mut book = Flipbook::new(0.1, PlayMode::Once);
        book.load_sequence(&store, "walk");

        assert!(!book.advance(0.05));
        assert_eq!(book.current_index(), 0);
        assert!(!book.advance(0.06));
        assert!(!book.advance(0.1));
        assert_eq!(book.current_index(), 2);
        assert!(book.advance(0.1));
        assert!(book.is_finished());
        assert_eq!(book.current_index(), 2);
        assert!(!book.advance(0.1));
    }

    #[test]
    fn loop_wraps() {
        let store = AssetStore::new();
        frames(&store, "spin", 2);
        let mut book = Flipbook::new(0.1, PlayMode::Loop);
        book.load_sequence(&store, "spin");

        book.advance(0.1);
        book.advance(0.1);
        assert_eq!(book.current_index(), 0);
        assert!(!book.is_finished());
    }

    #[test]
    fn numbered_frames_skip_gaps() {
        let store = AssetStore::new();
        frames(&store, "ball1", 1);
        frames(&store, "ball3", 1);
        let mut book = Flipbook::new(0.1, PlayMode::Once);
        book.load_numbered(&store, "ball", 3);
        assert_eq!(book.frame_count(), 2);
    }
}
