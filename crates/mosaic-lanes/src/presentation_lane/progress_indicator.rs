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

//! A character walking across the screen as slots fill up.

use super::{Flipbook, PlayMode};
use mosaic_core::asset::{AssetHandle, Bitmap, NamedAssetSource};
use mosaic_core::math::{saturate, Vec2};
use mosaic_core::scene::VisualElement;
use std::any::Any;

/// Stage name of the progress indicator.
pub const PROGRESS_INDICATOR: &str = "ProgressIndicator";

const WALK_FRAME_SECS: f32 = 0.1;

/// Shows loading progress as a looping sprite moved along a track.
#[derive(Debug)]
pub struct ProgressIndicator {
    character: String,
    walk: Flipbook,
    progress: f32,
    track_start: Vec2,
    track_end: Vec2,
}

impl ProgressIndicator {
    /// Creates the indicator using the multi-frame asset `character`.
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            walk: Flipbook::new(WALK_FRAME_SECS, PlayMode::Loop),
            progress: 0.0,
            track_start: Vec2::new(0.0, 880.0),
            track_end: Vec2::new(1800.0, 880.0),
        }
    }

    /// Sets the progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = saturate(progress);
    }

    /// The displayed progress.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Where the sprite is drawn.
    pub fn position(&self) -> Vec2 {
        Vec2::lerp(self.track_start, self.track_end, self.progress)
    }

    /// The frame to draw.
    pub fn current_frame(&self) -> Option<&AssetHandle<Bitmap>> {
        self.walk.current_frame()
    }
}

impl VisualElement for ProgressIndicator {
    fn name(&self) -> &str {
        PROGRESS_INDICATOR
    }

    fn initialize(&mut self, assets: &dyn NamedAssetSource) {
        self.walk.load_sequence(assets, &self.character);
    }

    fn update(&mut self, delta_seconds: f32) {
        self.walk.advance(delta_seconds);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
