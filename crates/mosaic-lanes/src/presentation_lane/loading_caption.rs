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

//! The looping "loading" caption.

use super::{Flipbook, PlayMode};
use mosaic_core::asset::{AssetHandle, Bitmap, NamedAssetSource};
use mosaic_core::math::Vec2;
use mosaic_core::scene::VisualElement;
use std::any::Any;

/// Stage name of the loading caption.
pub const LOADING_CAPTION: &str = "LoadingCaption";

/// Loops the frames of a multi-frame asset in a fixed corner.
#[derive(Debug)]
pub struct LoadingCaption {
    asset: String,
    flipbook: Flipbook,
    /// Screen-space top-left corner.
    pub position: Vec2,
}

impl LoadingCaption {
    /// Creates the caption over the frames registered as `asset`.
    pub fn new(asset: impl Into<String>, frame_secs: f32) -> Self {
        Self {
            asset: asset.into(),
            flipbook: Flipbook::new(frame_secs, PlayMode::Loop),
            position: Vec2::new(10.0, 960.0),
        }
    }

    /// The frame to draw.
    pub fn current_frame(&self) -> Option<&AssetHandle<Bitmap>> {
        self.flipbook.current_frame()
    }

    /// Index of the frame to draw.
    pub fn current_index(&self) -> usize {
        self.flipbook.current_index()
    }
}

impl VisualElement for LoadingCaption {
    fn name(&self) -> &str {
        LOADING_CAPTION
    }

    fn initialize(&mut self, assets: &dyn NamedAssetSource) {
        self.flipbook.load_sequence(assets, &self.asset);
        if self.flipbook.frame_count() == 0 {
            log::debug!("Loading caption has no '{}' frames", self.asset);
        }
    }

    fn update(&mut self, delta_seconds: f32) {
        self.flipbook.advance(delta_seconds);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
