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

//! Ownership of visual elements.
//!
//! Elements live in a generation-checked arena and are addressed by
//! [`ElementHandle`]. Removing an element bumps its slot's generation, so a
//! handle kept by someone else resolves to `None` instead of a different element.

mod arena;
mod stage;

pub use arena::*;
pub use stage::*;
