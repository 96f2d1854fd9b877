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

//! Cross-fade between two backgrounds through a white flash.

use mosaic_core::asset::{AssetHandle, Bitmap, NamedAssetSource};
use mosaic_core::math::saturate;
use mosaic_core::scene::VisualElement;
use std::any::Any;

/// Stage name of the background element.
pub const BACKGROUND: &str = "Background";

/// Which background is drawn underneath the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBackground {
    /// The loading background.
    Primary,
    /// The background revealed by the transition.
    Secondary,
}

/// Draws the primary background and, once started, flashes to the secondary.
///
/// The overlay alpha rises to 255 over the first half of the duration and falls
/// back to 0 over the second. The secondary background is drawn underneath from
/// the midpoint on, and becomes the active background at the end.
#[derive(Debug)]
pub struct BackgroundTransition {
    primary_name: String,
    secondary_name: String,
    primary: Option<AssetHandle<Bitmap>>,
    secondary: Option<AssetHandle<Bitmap>>,
    active: ActiveBackground,
    duration_secs: f32,
    progress: f32,
    fading: bool,
    overlay_alpha: u8,
    warned_missing: bool,
}

impl BackgroundTransition {
    /// Creates the element. Backgrounds are resolved on initialization.
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        duration_secs: f32,
    ) -> Self {
        Self {
            primary_name: primary.into(),
            secondary_name: secondary.into(),
            primary: None,
            secondary: None,
            active: ActiveBackground::Primary,
            duration_secs,
            progress: 0.0,
            fading: false,
            overlay_alpha: 0,
            warned_missing: false,
        }
    }

    /// Starts the flash.
    ///
    /// Returns `false` if the secondary background is not loaded; the caller may
    /// try again later. Starting an already running or finished transition
    /// succeeds without restarting it.
    pub fn start_transition(&mut self) -> bool {
        if self.secondary.is_none() {
            if !self.warned_missing {
                log::warn!(
                    "Cannot start background transition: '{}' is not loaded",
                    self.secondary_name
                );
                self.warned_missing = true;
            } else {
                log::debug!("Background transition still waiting for '{}'", self.secondary_name);
            }
            return false;
        }
        if self.fading || self.active == ActiveBackground::Secondary {
            return true;
        }
        self.fading = true;
        self.progress = 0.0;
        log::info!("Background transition started");
        true
    }

    /// Whether the flash is running.
    pub fn is_fading(&self) -> bool {
        self.fading
    }

    /// Normalized progress of the flash, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Alpha of the white overlay.
    pub fn overlay_alpha(&self) -> u8 {
        self.overlay_alpha
    }

    /// Whether the secondary background is drawn under the overlay.
    pub fn shows_secondary(&self) -> bool {
        self.active == ActiveBackground::Secondary || (self.fading && self.progress >= 0.5)
    }

    /// The background currently swapped in.
    pub fn active(&self) -> ActiveBackground {
        self.active
    }

    /// The bitmap to draw underneath the overlay.
    pub fn current_bitmap(&self) -> Option<&AssetHandle<Bitmap>> {
        if self.shows_secondary() {
            self.secondary.as_ref()
        } else {
            self.primary.as_ref()
        }
    }
}

impl VisualElement for BackgroundTransition {
    fn name(&self) -> &str {
        BACKGROUND
    }

    fn initialize(&mut self, assets: &dyn NamedAssetSource) {
        self.primary = assets.lookup_named(&self.primary_name, 0);
        self.secondary = assets.lookup_named(&self.secondary_name, 0);
    }

    fn update(&mut self, delta_seconds: f32) {
        if !self.fading {
            return;
        }

        self.progress = if self.duration_secs > 0.0 {
            saturate(self.progress + delta_seconds / self.duration_secs)
        } else {
            1.0
        };

        if self.progress >= 1.0 {
            self.fading = false;
            self.active = ActiveBackground::Secondary;
            self.overlay_alpha = 0;
            log::info!("Background transition complete");
            return;
        }

        let ramp = if self.progress <= 0.5 {
            self.progress / 0.5
        } else {
            (1.0 - self.progress) / 0.5
        };
        self.overlay_alpha = (saturate(ramp) * 255.0) as u8;
    }

    fn is_complete(&self) -> bool {
        self.active == ActiveBackground::Secondary
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
