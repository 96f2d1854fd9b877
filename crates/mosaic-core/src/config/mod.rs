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

//! Runtime configuration for streaming and the reveal sequence.
//!
//! Every field has a default, so a configuration file only needs to list what
//! it overrides. Loading from disk lives in `mosaic-io`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Largest accepted `target_size`. Sources are read at twice this edge length.
pub const MAX_TARGET_SIZE: u32 = 8192;

/// A configuration value that cannot drive the pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A count that must be at least one was zero.
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
    /// A value exceeded its upper bound.
    #[error("`{field}` must be at most {max} (got {value})")]
    TooLarge {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// The largest accepted value.
        max: u64,
    },
    /// A duration was negative or not finite.
    #[error("`{field}` must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Directory whose files are streamed, one slot per file.
    pub source_dir: PathBuf,
    /// Line-oriented list of named assets loaded at startup.
    pub manifest_path: PathBuf,
    /// Optional cap on the number of streamed files.
    pub max_assets: Option<usize>,
    /// Number of background decode threads.
    pub worker_count: usize,
    /// Milliseconds between streaming batches.
    pub tick_interval_ms: u64,
    /// Maximum icons spawned per streaming batch.
    pub spawn_batch: usize,
    /// Maximum loads scheduled per streaming batch.
    pub load_batch: usize,
    /// Extra attempts granted to an index whose load failed.
    pub retry_limit: u32,
    /// Edge length of streamed bitmaps. Sources are expected at twice this size.
    pub target_size: u32,
    /// Icon grid layout.
    pub grid: GridConfig,
    /// Phase durations.
    pub timing: TimingConfig,
    /// Names of the assets the presentation elements display.
    pub art: ArtConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("Media/Streaming"),
            manifest_path: PathBuf::from("Media/assets.txt"),
            max_assets: None,
            worker_count: 30,
            tick_interval_ms: 500,
            spawn_batch: 20,
            load_batch: 40,
            retry_limit: 1,
            target_size: 256,
            grid: GridConfig::default(),
            timing: TimingConfig::default(),
            art: ArtConfig::default(),
        }
    }
}

impl StreamConfig {
    /// Rejects values the sequencer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("worker_count", self.worker_count),
            ("spawn_batch", self.spawn_batch),
            ("load_batch", self.load_batch),
            ("target_size", self.target_size as usize),
            ("grid.max_columns", self.grid.max_columns),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigError::Zero(field));
            }
        }
        if self.target_size > MAX_TARGET_SIZE {
            return Err(ConfigError::TooLarge {
                field: "target_size",
                value: u64::from(self.target_size),
                max: u64::from(MAX_TARGET_SIZE),
            });
        }
        self.timing.validate()
    }
}

/// Icon grid placement, in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Columns before wrapping to the next row.
    pub max_columns: usize,
    /// Horizontal distance between columns.
    pub cell_width: f32,
    /// Vertical distance between rows.
    pub cell_height: f32,
    /// X of column 0.
    pub origin_x: f32,
    /// Y of row 0.
    pub origin_y: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_columns: 28,
            cell_width: 68.0,
            cell_height: 68.0,
            origin_x: -65.0,
            origin_y: -100.0,
        }
    }
}

/// Durations of the self-timed phases, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Background transition length.
    pub transition_secs: f32,
    /// Pause between the end of the transition and the start of the icon fade.
    pub fade_delay_secs: f32,
    /// Icon fade-in length.
    pub fade_secs: f32,
    /// Pause between the end of the fade and the start of the scroll.
    pub scroll_delay_secs: f32,
    /// Scroll length.
    pub scroll_secs: f32,
    /// Total vertical scroll distance in pixels.
    pub scroll_distance: f32,
    /// Time each intro animation frame stays on screen.
    pub intro_frame_secs: f32,
    /// Time the last intro frame is held before the animation completes.
    pub intro_hold_secs: f32,
    /// Time each loading caption frame stays on screen.
    pub caption_frame_secs: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_secs: 2.0,
            fade_delay_secs: 0.5,
            fade_secs: 1.5,
            scroll_delay_secs: 2.0,
            scroll_secs: 3.0,
            scroll_distance: 680.0,
            intro_frame_secs: 0.095,
            intro_hold_secs: 0.5,
            caption_frame_secs: 0.10,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("timing.transition_secs", self.transition_secs),
            ("timing.fade_delay_secs", self.fade_delay_secs),
            ("timing.fade_secs", self.fade_secs),
            ("timing.scroll_delay_secs", self.scroll_delay_secs),
            ("timing.scroll_secs", self.scroll_secs),
            ("timing.intro_frame_secs", self.intro_frame_secs),
            ("timing.intro_hold_secs", self.intro_hold_secs),
            ("timing.caption_frame_secs", self.caption_frame_secs),
        ];
        for (field, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }
        if !self.scroll_distance.is_finite() {
            return Err(ConfigError::InvalidDuration {
                field: "timing.scroll_distance",
                value: self.scroll_distance,
            });
        }
        Ok(())
    }
}

/// Named-asset keys used by the presentation elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtConfig {
    /// Prefix of the intro animation frames (`<prefix>1`, `<prefix>2`, ...).
    pub intro_prefix: String,
    /// Number of intro animation frames.
    pub intro_frames: usize,
    /// Background shown while loading.
    pub primary_background: String,
    /// Background revealed by the transition.
    pub secondary_background: String,
    /// Multi-frame asset looped by the loading caption.
    pub caption: String,
    /// Multi-frame asset cycled by the progress indicator.
    pub progress_character: String,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            intro_prefix: "pokeball".to_string(),
            intro_frames: 3,
            primary_background: "bg1".to_string(),
            secondary_background: "bg2".to_string(),
            caption: "loading".to_string(),
            progress_character: "character".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(StreamConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_workers_rejected() {
        let config = StreamConfig {
            worker_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Zero("worker_count")));
    }

    #[test]
    fn oversized_target_rejected() {
        let config = StreamConfig {
            target_size: 1 << 31,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge {
                field: "target_size",
                ..
            })
        ));

        let config = StreamConfig {
            target_size: MAX_TARGET_SIZE,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn negative_duration_rejected() {
        let mut config = StreamConfig::default();
        config.timing.fade_secs = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration {
                field: "timing.fade_secs",
                ..
            })
        ));
    }
}
