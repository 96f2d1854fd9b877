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

//! # Mosaic Lanes
//!
//! Hot-path execution pipelines. Lanes do the work; agents decide when.
//!
//! - [`asset_lane`]: decoding and downsampling images, and the load task that
//!   publishes them into the store.
//! - [`worker_lane`]: the fixed-size pool of background threads.
//! - [`presentation_lane`]: per-frame animators consumed by the sequencer.

#![warn(missing_docs)]

pub mod asset_lane;
pub mod presentation_lane;
pub mod worker_lane;
