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

use mosaic_core::asset::{AssetHandle, Bitmap};
use mosaic_core::math::Vec2;

/// One revealed icon.
///
/// The bitmap is shared with the store; the icon never owns asset data.
#[derive(Debug, Clone)]
pub struct IconEntry {
    /// Spawn sequence number, starting at 0.
    pub id: usize,
    /// The store slot backing this icon.
    pub slot: usize,
    /// Grid column, `id % max_columns`.
    pub grid_column: usize,
    /// Grid row, `id / max_columns`.
    pub grid_row: usize,
    /// Draw opacity, 0 to 255.
    pub opacity: u8,
    /// Position of the grid cell before any scroll offset.
    pub base_position: Vec2,
    /// Current draw position.
    pub position: Vec2,
    /// The displayed bitmap.
    pub asset: AssetHandle<Bitmap>,
}

impl IconEntry {
    /// Moves the icon `offset` pixels below its grid cell.
    pub fn apply_scroll(&mut self, offset: f32) {
        self.position = self.base_position.offset_y(offset);
    }
}
