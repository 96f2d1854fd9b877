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

use mosaic_core::config::GridConfig;
use mosaic_core::math::Vec2;

/// Row-major icon placement that wraps at a fixed column count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    max_columns: usize,
    cell: Vec2,
    origin: Vec2,
}

impl GridLayout {
    /// Creates a layout. `max_columns` is raised to at least one.
    pub fn new(max_columns: usize, cell: Vec2, origin: Vec2) -> Self {
        Self {
            max_columns: max_columns.max(1),
            cell,
            origin,
        }
    }

    /// Builds the layout described by `config`.
    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(
            config.max_columns,
            Vec2::new(config.cell_width, config.cell_height),
            Vec2::new(config.origin_x, config.origin_y),
        )
    }

    /// `(column, row)` of the `sequence`-th icon.
    pub fn cell(&self, sequence: usize) -> (usize, usize) {
        (sequence % self.max_columns, sequence / self.max_columns)
    }

    /// Screen position of a cell.
    pub fn position(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + column as f32 * self.cell.x,
            self.origin.y + row as f32 * self.cell.y,
        )
    }

    /// Columns per row.
    pub fn max_columns(&self) -> usize {
        self.max_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_max_columns() {
        let grid = GridLayout::from_config(&GridConfig::default());
        assert_eq!(grid.cell(0), (0, 0));
        assert_eq!(grid.cell(27), (27, 0));
        assert_eq!(grid.cell(28), (0, 1));
        assert_eq!(grid.cell(57), (1, 2));
    }

    #[test]
    fn positions_start_at_origin() {
        let grid = GridLayout::from_config(&GridConfig::default());
        assert_eq!(grid.position(0, 0), Vec2::new(-65.0, -100.0));
        assert_eq!(grid.position(2, 1), Vec2::new(71.0, -32.0));
    }
}
