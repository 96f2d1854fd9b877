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

//! Easing curves for time-driven transitions.
//!
//! Every function here takes a progress value and clamps it to `[0, 1]` first,
//! so callers can feed raw `elapsed / duration` ratios.

use super::saturate;

/// Quadratic ease-in-out.
///
/// Symmetric around the midpoint: `ease_in_out(0.5) == 0.5` and
/// `ease_in_out(t) + ease_in_out(1 - t) == 1`.
///
/// # Examples
///
/// ```
/// use mosaic_core::math::ease_in_out;
/// assert_eq!(ease_in_out(0.0), 0.0);
/// assert_eq!(ease_in_out(0.5), 0.5);
/// assert_eq!(ease_in_out(1.0), 1.0);
/// ```
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = saturate(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

/// Linear opacity ramp: `clamp(elapsed / duration, 0, 1) * 255`.
///
/// A non-positive `duration` is treated as an instant fade.
///
/// # Examples
///
/// ```
/// use mosaic_core::math::fade_opacity;
/// assert_eq!(fade_opacity(0.0, 1.5), 0);
/// assert_eq!(fade_opacity(1.5, 1.5), 255);
/// assert_eq!(fade_opacity(9.0, 1.5), 255);
/// ```
#[inline]
pub fn fade_opacity(elapsed: f32, duration: f32) -> u8 {
    if duration <= 0.0 {
        return u8::MAX;
    }
    (saturate(elapsed / duration) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ease_in_out_is_symmetric() {
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert_relative_eq!(ease_in_out(t) + ease_in_out(1.0 - t), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn ease_in_out_is_monotonic_and_clamped() {
        let mut previous = ease_in_out(-1.0);
        assert_eq!(previous, 0.0);
        for i in 1..=100 {
            let value = ease_in_out(i as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(ease_in_out(3.0), 1.0);
    }

    #[test]
    fn fade_opacity_is_linear() {
        assert_eq!(fade_opacity(0.75, 1.5), 127);
        assert_eq!(fade_opacity(-1.0, 1.5), 0);
        assert_eq!(fade_opacity(1.0, 0.0), 255);
    }
}
