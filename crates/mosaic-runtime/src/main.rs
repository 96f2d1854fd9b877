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

//! Headless host: streams a source directory and plays the reveal sequence to
//! completion at a fixed frame step.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mosaic_agents::PhaseSequencer;
use mosaic_core::{Stopwatch, StreamConfig};
use mosaic_data::{AssetStore, Stage};
use mosaic_io::{load_config_or_default, AssetManifest, SourceCatalog};
use mosaic_lanes::asset_lane::{preload_manifest, BitmapLoaderLane};
use mosaic_lanes::presentation_lane::BackgroundTransition;
use mosaic_telemetry::MetricsRegistry;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file. Defaults apply when it does not exist.
    #[arg(long, default_value = "Mosaic.toml")]
    config: PathBuf,

    /// Directory of images to stream.
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Named asset manifest.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Worker thread count.
    #[arg(long)]
    workers: Option<usize>,

    /// Stream at most this many files.
    #[arg(long)]
    max_assets: Option<usize>,

    /// Fixed frame step in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Stop after this many frames even if the sequence is not done.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<StreamConfig> {
        let mut config = load_config_or_default(&self.config)?;
        if let Some(dir) = &self.source_dir {
            config.source_dir = dir.clone();
        }
        if let Some(manifest) = &self.manifest {
            config.manifest_path = manifest.clone();
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if self.max_assets.is_some() {
            config.max_assets = self.max_assets;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let config = cli.resolve_config()?;
    run(&cli, config)
}

fn run(cli: &Cli, config: StreamConfig) -> Result<()> {
    let clock = Stopwatch::new();

    let mut catalog = SourceCatalog::scan(&config.source_dir)
        .with_context(|| format!("Failed to enumerate {}", config.source_dir.display()))?;
    if let Some(max) = config.max_assets {
        catalog.truncate(max);
    }
    log::info!("Streaming {} files from {}", catalog.len(), catalog.root().display());
    let catalog = Arc::new(catalog);

    let store = AssetStore::with_slots(catalog.len());
    match AssetManifest::load(&config.manifest_path) {
        Ok(manifest) => {
            preload_manifest(&store, &manifest, &BitmapLoaderLane::native());
        }
        Err(e) => log::warn!("Skipping named assets: {:#}", anyhow::Error::from(e)),
    }
    let store = Arc::new(store);

    let mut stage = Stage::new();
    stage.add(
        Box::new(BackgroundTransition::new(
            config.art.primary_background.clone(),
            config.art.secondary_background.clone(),
            config.timing.transition_secs,
        )),
        &*store,
    );

    let registry = MetricsRegistry::new();
    let mut sequencer = PhaseSequencer::new(config, store.clone(), catalog, &registry);
    sequencer.start(&mut stage)?;

    let step = Duration::from_millis(cli.frame_ms);
    let delta_seconds = step.as_secs_f32();
    let mut frames: u64 = 0;
    while !sequencer.is_done() {
        if cli.max_frames.is_some_and(|max| frames >= max) {
            log::warn!("Stopping after {} frames in phase {}", frames, sequencer.phase());
            break;
        }
        sequencer.tick(delta_seconds, &mut stage);
        stage.update_all(delta_seconds);
        frames += 1;
        thread::sleep(step);
    }

    for timing in sequencer.phase_timings() {
        log::info!("  {:<20} {:>8.2}s", timing.phase.to_string(), timing.seconds);
    }
    log::info!(
        "Finished in {:.2}s over {} frames: {}/{} populated, {} icons, {} abandoned",
        clock.elapsed_secs_f64(),
        frames,
        store.populated_count(),
        sequencer.total(),
        sequencer.spawned_count(),
        sequencer.abandoned().len()
    );
    registry.log_summary();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let cli = Cli::parse_from([
            "mosaic-runtime",
            "--config",
            "does-not-exist.toml",
            "--source-dir",
            "icons",
            "--workers",
            "4",
            "--max-assets",
            "10",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.source_dir, PathBuf::from("icons"));
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.max_assets, Some(10));
        assert_eq!(config.spawn_batch, 20);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let cli = Cli::parse_from(["mosaic-runtime", "--config", "nope.toml", "--workers", "0"]);
        assert!(cli.resolve_config().is_err());
    }
}
