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

//! The contract between the sequencer and the visual elements it drives.
//!
//! Elements are drawn by an external renderer. The core only needs to build
//! them, advance them in time and ask whether a one-shot animation is over.

use crate::asset::NamedAssetSource;
use std::any::Any;

/// A per-frame animator owned by the stage.
pub trait VisualElement: Send {
    /// The unique name the element is registered under.
    fn name(&self) -> &str;

    /// Resolves the named assets this element displays.
    ///
    /// Called once, when the element is added to the stage. Missing assets are
    /// not an error: the element degrades to drawing nothing for them.
    fn initialize(&mut self, assets: &dyn NamedAssetSource);

    /// Advances the element by `delta_seconds`.
    fn update(&mut self, delta_seconds: f32);

    /// Whether a one-shot animation has finished. Looping elements never complete.
    fn is_complete(&self) -> bool {
        false
    }

    /// Allows downcasting to the concrete element type.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to the concrete element type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
