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

//! Per-frame context handed to agents.

use std::any::Any;

/// Frame context providing access to the host's state.
pub struct FrameContext<'a> {
    /// Seconds elapsed since the previous frame.
    pub delta_seconds: f32,

    /// A type-erased pointer to the stage holding visual elements.
    /// This allows agents to reach it without mosaic-core depending on mosaic-data.
    pub stage: Option<&'a mut dyn Any>,
}

impl<'a> FrameContext<'a> {
    /// Creates a context for a frame of `delta_seconds`.
    pub fn new(delta_seconds: f32, stage: Option<&'a mut dyn Any>) -> Self {
        Self {
            delta_seconds,
            stage,
        }
    }
}
