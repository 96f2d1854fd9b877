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

use approx::assert_relative_eq;
use image::{Rgba, RgbaImage};
use mosaic_agents::{PhaseSequencer, PhaseState};
use mosaic_core::agent::Agent;
use mosaic_core::asset::{AssetHandle, Bitmap};
use mosaic_core::config::{StreamConfig, TimingConfig};
use mosaic_core::math::{ease_in_out, fade_opacity};
use mosaic_core::FrameContext;
use mosaic_data::{AssetStore, Stage};
use mosaic_io::SourceCatalog;
use mosaic_lanes::presentation_lane::BackgroundTransition;
use mosaic_telemetry::MetricsRegistry;
use std::any::Any;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const DT: f32 = 0.016;
const MAX_TICKS: usize = 2000;

struct Fixture {
    _dir: TempDir,
    store: Arc<AssetStore>,
    catalog: Arc<SourceCatalog>,
}

fn fixture(count: usize, corrupt: &[usize]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..count {
        let path = dir.path().join(format!("icon_{i:03}.png"));
        if corrupt.contains(&i) {
            std::fs::write(path, b"definitely not a png").unwrap();
        } else {
            RgbaImage::from_pixel(8, 8, Rgba([i as u8, 0, 0, 255]))
                .save(path)
                .unwrap();
        }
    }
    let catalog = Arc::new(SourceCatalog::scan(dir.path()).unwrap());
    let store = AssetStore::with_slots(catalog.len());
    for name in ["bg1", "bg2", "pokeball1", "pokeball2", "pokeball3", "loading", "character"] {
        let bitmap = Bitmap::from_rgba8(1, 1, vec![255; 4]).unwrap();
        store.append_named(name, AssetHandle::new(bitmap));
    }
    Fixture {
        _dir: dir,
        store: Arc::new(store),
        catalog,
    }
}

fn fast_config() -> StreamConfig {
    let mut config = StreamConfig::default();
    config.worker_count = 2;
    config.tick_interval_ms = 10;
    config.spawn_batch = 2;
    config.load_batch = 2;
    config.target_size = 4;
    config.timing = TimingConfig {
        transition_secs: 0.05,
        fade_delay_secs: 0.02,
        fade_secs: 0.05,
        scroll_delay_secs: 0.02,
        scroll_secs: 0.05,
        scroll_distance: 100.0,
        intro_frame_secs: 0.01,
        intro_hold_secs: 0.01,
        caption_frame_secs: 0.01,
    };
    config
}

fn staged(fixture: &Fixture) -> Stage {
    let mut stage = Stage::new();
    stage.add(
        Box::new(BackgroundTransition::new("bg1", "bg2", 0.05)),
        &*fixture.store,
    );
    stage
}

fn run_until(
    sequencer: &mut PhaseSequencer,
    stage: &mut Stage,
    mut stop: impl FnMut(&PhaseSequencer) -> bool,
    mut observe: impl FnMut(&PhaseSequencer),
) {
    for _ in 0..MAX_TICKS {
        sequencer.tick(DT, stage);
        stage.update_all(DT);
        observe(sequencer);
        if stop(sequencer) {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("sequencer stuck in {}", sequencer.phase());
}

#[test]
fn three_assets_reveal_in_order() {
    let fixture = fixture(3, &[]);
    let mut stage = staged(&fixture);
    let registry = MetricsRegistry::new();
    let mut sequencer = PhaseSequencer::new(
        fast_config(),
        fixture.store.clone(),
        fixture.catalog.clone(),
        &registry,
    );
    sequencer.start(&mut stage).unwrap();

    run_until(&mut sequencer, &mut stage, |s| s.is_done(), |_| {});

    assert_eq!(fixture.store.populated_count(), 3);
    let cells: Vec<(usize, usize)> = sequencer
        .icons()
        .iter()
        .map(|icon| (icon.grid_column, icon.grid_row))
        .collect();
    assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0)]);

    let mut slots: Vec<usize> = sequencer.icons().iter().map(|icon| icon.slot).collect();
    slots.sort_unstable();
    assert_eq!(slots, vec![0, 1, 2]);

    for icon in sequencer.icons() {
        assert_eq!(icon.opacity, 255);
        assert_eq!(icon.asset.size().width, 4);
        assert_relative_eq!(icon.position.y, icon.base_position.y + 100.0);
    }
    assert_relative_eq!(sequencer.progress(), 1.0);
    assert!(sequencer.abandoned().is_empty());
    assert_eq!(stage.find_by_name("ProgressIndicator"), None);
    assert_eq!(stage.find_by_name("IntroAnimation"), None);

    let timings: Vec<PhaseState> = sequencer.phase_timings().iter().map(|t| t.phase).collect();
    assert_eq!(timings.len(), 8);
    assert_eq!(timings[0], PhaseState::Streaming);
    assert_eq!(timings[7], PhaseState::Scrolling);
}

#[test]
fn spawning_never_outruns_population_and_phases_only_advance() {
    let fixture = fixture(12, &[]);
    let mut stage = staged(&fixture);
    let registry = MetricsRegistry::new();
    let mut sequencer = PhaseSequencer::new(
        fast_config(),
        fixture.store.clone(),
        fixture.catalog.clone(),
        &registry,
    );
    sequencer.start(&mut stage).unwrap();

    let mut last_phase = PhaseState::Streaming;
    let mut last_populated = 0;
    run_until(
        &mut sequencer,
        &mut stage,
        |s| s.is_done(),
        |s| {
            assert!(s.spawned_count() <= s.populated_count());
            assert!(s.populated_count() >= last_populated);
            assert!(s.phase() >= last_phase);
            last_populated = s.populated_count();
            last_phase = s.phase();
        },
    );

    for (k, icon) in sequencer.icons().iter().enumerate() {
        assert_eq!(icon.id, k);
        assert_eq!(icon.grid_column, k % 28);
        assert_eq!(icon.grid_row, k / 28);
    }
    assert_eq!(sequencer.spawned_count(), 12);
}

#[test]
fn fade_and_scroll_follow_elapsed_time() {
    let fixture = fixture(4, &[]);
    let mut stage = staged(&fixture);
    let registry = MetricsRegistry::new();
    let mut config = fast_config();
    config.timing.fade_delay_secs = 0.1;
    config.timing.fade_secs = 0.2;
    config.timing.scroll_secs = 0.32;
    let timing = config.timing.clone();
    let mut sequencer = PhaseSequencer::new(
        config,
        fixture.store.clone(),
        fixture.catalog.clone(),
        &registry,
    );
    sequencer.start(&mut stage).unwrap();

    let mut previous = PhaseState::Streaming;
    let mut fade_elapsed = 0.0_f32;
    let mut scroll_elapsed = 0.0_f32;
    let mut waited_for_delay = false;
    let mut passed_midpoint = false;
    run_until(
        &mut sequencer,
        &mut stage,
        |s| s.is_done(),
        |s| {
            let phase = s.phase();
            assert!(s.icons().iter().all(|icon| icon.opacity == s.opacity()));

            if previous == PhaseState::FadingIn {
                fade_elapsed += DT;
                let past_delay = fade_elapsed - timing.fade_delay_secs;
                if past_delay < 0.0 {
                    assert_eq!(s.opacity(), 0);
                    waited_for_delay = true;
                } else {
                    let expected = fade_opacity(past_delay, timing.fade_secs);
                    assert!(
                        s.opacity().abs_diff(expected) <= 1,
                        "opacity {} at {:.3}s, expected {}",
                        s.opacity(),
                        fade_elapsed,
                        expected
                    );
                }
            } else if phase == PhaseState::FadingIn {
                assert_eq!(s.opacity(), 0);
            }

            if previous == PhaseState::Scrolling {
                scroll_elapsed += DT;
                let t = scroll_elapsed / timing.scroll_secs;
                let offset = s.scroll_offset();
                assert_relative_eq!(
                    offset,
                    ease_in_out(t) * timing.scroll_distance,
                    epsilon = 0.01
                );
                if t < 0.49 {
                    assert!(offset < t * timing.scroll_distance);
                }
                if (t - 0.5).abs() < 0.5 * DT / timing.scroll_secs + 1e-4 {
                    assert_relative_eq!(offset, 0.5 * timing.scroll_distance, epsilon = 0.5);
                    passed_midpoint = true;
                }
                for icon in s.icons() {
                    assert_relative_eq!(icon.position.y, icon.base_position.y + offset);
                }
            } else if phase == PhaseState::Scrolling {
                assert_relative_eq!(s.scroll_offset(), 0.0);
            }

            previous = phase;
        },
    );

    assert!(waited_for_delay);
    assert!(passed_midpoint);
    assert_eq!(sequencer.opacity(), 255);
    assert_relative_eq!(sequencer.scroll_offset(), timing.scroll_distance);
}

#[test]
fn failed_decode_is_abandoned_and_the_run_finishes() {
    let fixture = fixture(3, &[1]);
    let mut stage = staged(&fixture);
    let registry = MetricsRegistry::new();
    let mut sequencer = PhaseSequencer::new(
        fast_config(),
        fixture.store.clone(),
        fixture.catalog.clone(),
        &registry,
    );
    sequencer.start(&mut stage).unwrap();

    run_until(&mut sequencer, &mut stage, |s| s.is_done(), |_| {});

    assert_eq!(sequencer.abandoned(), &[1]);
    assert_eq!(fixture.store.populated_count(), 2);
    assert!(!fixture.store.is_populated(1));
    assert_eq!(sequencer.spawned_count(), 2);
    assert!(sequencer.icons().iter().all(|icon| icon.slot != 1));

    let failed = registry
        .snapshot()
        .into_iter()
        .find(|m| m.id.to_string() == "assets:failed_total")
        .and_then(|m| m.value.as_counter());
    assert_eq!(failed, Some(2));
    assert!(sequencer.report_status().health_score < 1.0);
}

#[test]
fn missing_background_is_retried_until_it_appears() {
    let fixture = fixture(2, &[]);
    let mut stage = Stage::new();
    let registry = MetricsRegistry::new();
    let mut sequencer = PhaseSequencer::new(
        fast_config(),
        fixture.store.clone(),
        fixture.catalog.clone(),
        &registry,
    );
    sequencer.start(&mut stage).unwrap();

    run_until(
        &mut sequencer,
        &mut stage,
        |s| s.phase() == PhaseState::AwaitingTransition,
        |_| {},
    );
    for _ in 0..20 {
        sequencer.tick(DT, &mut stage);
        assert_eq!(sequencer.phase(), PhaseState::AwaitingTransition);
    }
    assert!(sequencer.report_status().is_stalled);

    stage.add(
        Box::new(BackgroundTransition::new("bg1", "bg2", 0.05)),
        &*fixture.store,
    );
    run_until(&mut sequencer, &mut stage, |s| s.is_done(), |_| {});
    assert_eq!(sequencer.spawned_count(), 2);
}

#[test]
fn agent_update_drives_the_stage_from_the_frame_context() {
    let fixture = fixture(1, &[]);
    let mut stage = staged(&fixture);
    let registry = MetricsRegistry::new();
    let mut sequencer = PhaseSequencer::new(
        fast_config(),
        fixture.store.clone(),
        fixture.catalog.clone(),
        &registry,
    );
    sequencer.start(&mut stage).unwrap();

    for _ in 0..MAX_TICKS {
        let mut context = FrameContext::new(DT, Some(&mut stage as &mut dyn Any));
        sequencer.update(&mut context);
        stage.update_all(DT);
        if sequencer.is_done() {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }

    assert!(sequencer.is_done());
    assert!(sequencer.report_status().message.contains("phase=Done"));
}
