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

//! Image decoding and downsampling.

use super::super::AssetLoaderLane;
use anyhow::Context;
use image::RgbaImage;
use mosaic_core::asset::Bitmap;
use std::error::Error;

/// How a decoded image is resized before it becomes a [`Bitmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resample {
    /// Keep the decoded resolution.
    Native,
    /// Produce a `target` x `target` image by sampling every second source pixel.
    ///
    /// Sources are expected to be exactly twice the target size. Other sizes are
    /// tolerated: sample coordinates are clamped to the source bounds.
    HalfNearest {
        /// Output edge length in pixels.
        target: u32,
    },
}

/// A lane dedicated to decoding image files into CPU bitmaps.
#[derive(Debug, Clone, Copy)]
pub struct BitmapLoaderLane {
    resample: Resample,
}

impl BitmapLoaderLane {
    /// Decodes at the file's own resolution.
    pub fn native() -> Self {
        Self {
            resample: Resample::Native,
        }
    }

    /// Decodes and downsamples to `target` x `target`.
    pub fn downsampling(target: u32) -> Self {
        Self {
            resample: Resample::HalfNearest { target },
        }
    }

    /// The resampling mode.
    pub fn resample(&self) -> Resample {
        self.resample
    }
}

impl AssetLoaderLane<Bitmap> for BitmapLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<Bitmap, Box<dyn Error + Send + Sync>> {
        let rgba = image::load_from_memory(bytes)
            .context("Failed to decode image from memory")?
            .to_rgba8();

        match self.resample {
            Resample::Native => {
                let (width, height) = rgba.dimensions();
                Bitmap::from_rgba8(width, height, rgba.into_raw())
                    .ok_or_else(|| "decoded buffer does not match its dimensions".into())
            }
            Resample::HalfNearest { target } => downsample_half(&rgba, target),
        }
    }
}

/// Nearest-neighbour sampling of every second pixel into a square `target` image.
pub fn downsample_half(
    source: &RgbaImage,
    target: u32,
) -> Result<Bitmap, Box<dyn Error + Send + Sync>> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err("cannot downsample an empty image".into());
    }
    let expected = target
        .checked_mul(2)
        .ok_or_else(|| format!("target size {target} is too large to downsample into"))?;
    if width != expected || height != expected {
        log::debug!(
            "Source is {}x{}, expected {}x{}; sampling is clamped",
            width,
            height,
            expected,
            expected
        );
    }

    let mut resized = RgbaImage::new(target, target);
    for (x, y, pixel) in resized.enumerate_pixels_mut() {
        let sx = (x * 2).min(width - 1);
        let sy = (y * 2).min(height - 1);
        *pixel = *source.get_pixel(sx, sy);
    }

    Bitmap::from_rgba8(target, target, resized.into_raw())
        .ok_or_else(|| "resized buffer does not match its dimensions".into())
}
