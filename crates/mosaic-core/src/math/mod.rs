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

//! Provides the small amount of 2D math the pipeline needs.
//!
//! Screen-space positions, pixel extents, clamping helpers and the easing curves
//! that drive fades and scrolling.

pub mod dimension;
pub mod easing;
pub mod vector;

pub use self::dimension::Extent2D;
pub use self::easing::{ease_in_out, fade_opacity};
pub use self::vector::Vec2;

/// Clamps a value to a specified minimum and maximum range.
///
/// # Examples
///
/// ```
/// use mosaic_core::math::clamp;
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
/// assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
/// ```
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min_val: T, max_val: T) -> T {
    if value < min_val {
        min_val
    } else if value > max_val {
        max_val
    } else {
        value
    }
}

/// Clamps a floating-point value to the `[0.0, 1.0]` range.
///
/// NaN maps to `0.0`.
///
/// # Examples
///
/// ```
/// use mosaic_core::math::saturate;
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(saturate(-0.5), 0.0);
/// ```
#[inline]
pub fn saturate(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    clamp(value, 0.0, 1.0)
}
