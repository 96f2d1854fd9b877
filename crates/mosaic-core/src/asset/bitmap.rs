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

use super::Asset;
use crate::math::Extent2D;

/// Number of bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An immutable, decoded RGBA8 image held in CPU memory.
///
/// Pixels are stored row-major, four bytes per pixel, with no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: Extent2D,
    pixels: Vec<u8>,
}

impl Asset for Bitmap {}

impl Bitmap {
    /// Builds a bitmap from raw RGBA8 bytes.
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height` pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let size = Extent2D { width, height };
        if pixels.len() as u64 != size.area() * BYTES_PER_PIXEL as u64 {
            return None;
        }
        Some(Self { size, pixels })
    }

    /// The bitmap dimensions in pixels.
    pub fn size(&self) -> Extent2D {
        self.size
    }

    /// The raw RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let offset = (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.pixels[offset..offset + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(Bitmap::from_rgba8(2, 2, vec![0; 15]).is_none());
        assert!(Bitmap::from_rgba8(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn pixel_addressing_is_row_major() {
        let mut pixels = vec![0u8; 2 * 2 * BYTES_PER_PIXEL];
        // (1, 1) is the fourth pixel.
        pixels[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let bitmap = Bitmap::from_rgba8(2, 2, pixels).unwrap();

        assert_eq!(bitmap.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(bitmap.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(bitmap.pixel(2, 0), None);
    }
}
