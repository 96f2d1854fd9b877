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

//! Loading [`StreamConfig`] from TOML.

use anyhow::{Context, Result};
use mosaic_core::StreamConfig;
use std::path::Path;

/// Reads, parses and validates the configuration file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<StreamConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config: StreamConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in '{}'", path.display()))?;
    log::info!("Loaded configuration from '{}'", path.display());
    Ok(config)
}

/// Loads `path` if it exists, otherwise returns the defaults.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<StreamConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        log::info!(
            "No configuration at '{}', using defaults",
            path.display()
        );
        Ok(StreamConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Mosaic.toml");
        std::fs::write(
            &path,
            "worker_count = 4\n[timing]\nfade_secs = 0.25\n[grid]\nmax_columns = 10\n",
        )?;

        let config = load_config(&path)?;
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.timing.fade_secs, 0.25);
        assert_eq!(config.grid.max_columns, 10);
        assert_eq!(config.spawn_batch, StreamConfig::default().spawn_batch);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Mosaic.toml");
        std::fs::write(&path, "load_batch = 0\n")?;
        assert!(load_config(&path).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_config_or_default(dir.path().join("absent.toml"))?;
        assert_eq!(config, StreamConfig::default());
        Ok(())
    }
}
