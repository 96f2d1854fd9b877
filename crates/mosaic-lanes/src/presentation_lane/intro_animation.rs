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

//! The one-shot animation played once loading completes.

use super::{Flipbook, PlayMode};
use mosaic_core::asset::{AssetHandle, Bitmap, NamedAssetSource};
use mosaic_core::math::Vec2;
use mosaic_core::scene::VisualElement;
use std::any::Any;

/// Stage name of the intro animation.
pub const INTRO_ANIMATION: &str = "IntroAnimation";

/// Plays `<prefix>1..<prefix>N` once, then holds the last frame.
#[derive(Debug)]
pub struct IntroAnimation {
    flipbook: Flipbook,
    prefix: String,
    frame_count: usize,
    hold_secs: f32,
    held: f32,
    complete: bool,
    /// Screen-space center.
    pub position: Vec2,
    /// Uniform draw scale.
    pub scale: f32,
}

impl IntroAnimation {
    /// Creates the animation. Frames are resolved on initialization.
    pub fn new(
        prefix: impl Into<String>,
        frame_count: usize,
        frame_secs: f32,
        hold_secs: f32,
    ) -> Self {
        Self {
            flipbook: Flipbook::new(frame_secs, PlayMode::Once),
            prefix: prefix.into(),
            frame_count,
            hold_secs,
            held: 0.0,
            complete: false,
            position: Vec2::new(960.0, 540.0),
            scale: 5.0,
        }
    }

    /// The frame to draw.
    pub fn current_frame(&self) -> Option<&AssetHandle<Bitmap>> {
        self.flipbook.current_frame()
    }
}

impl VisualElement for IntroAnimation {
    fn name(&self) -> &str {
        INTRO_ANIMATION
    }

    fn initialize(&mut self, assets: &dyn NamedAssetSource) {
        self.flipbook
            .load_numbered(assets, &self.prefix, self.frame_count);
        if self.flipbook.frame_count() == 0 {
            log::warn!("No '{}' frames loaded; skipping intro animation", self.prefix);
            self.complete = true;
        }
    }

    fn update(&mut self, delta_seconds: f32) {
        if self.complete {
            return;
        }
        if !self.flipbook.is_finished() {
            self.flipbook.advance(delta_seconds);
            return;
        }
        self.held += delta_seconds;
        if self.held >= self.hold_secs {
            self.complete = true;
            log::debug!("Intro animation complete");
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation_lane::flipbook::tests::frames;
    use mosaic_data::AssetStore;

    #[test]
    fn completes_after_frames_and_hold() {
        let store = AssetStore::new();
        for name in ["ball1", "ball2"] {
            frames(&store, name, 1);
        }
        let mut intro = IntroAnimation::new("ball", 2, 0.1, 0.2);
        intro.initialize(&store);

        intro.update(0.1);
        intro.update(0.1);
        assert!(!intro.is_complete());
        intro.update(0.1);
        assert!(!intro.is_complete());
        intro.update(0.1);
        assert!(intro.is_complete());
    }

    #[test]
    fn without_frames_completes_immediately() {
        let mut intro = IntroAnimation::new("ball", 3, 0.1, 0.5);
        intro.initialize(&AssetStore::new());
        assert!(intro.is_complete());
    }
}
