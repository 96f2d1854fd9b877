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

//! Per-frame animators placed on the stage.
//!
//! None of these own threads or touch the streaming pipeline. They resolve the
//! named frames they display once, at initialization, and advance with the
//! frame delta afterwards.

mod background_transition;
mod flipbook;
mod intro_animation;
mod loading_caption;
mod progress_indicator;

pub use background_transition::*;
pub use flipbook::*;
pub use intro_animation::*;
pub use loading_caption::*;
pub use progress_indicator::*;
