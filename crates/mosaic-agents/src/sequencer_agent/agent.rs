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

//! The PhaseSequencer drives asset streaming and the reveal that follows it.
//!
//! Each tick it first drains task completions posted by the worker pool, then
//! performs the work of the current [`PhaseState`]. All icon and phase state is
//! owned by the orchestrating thread; workers only write store slots and send
//! reports.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use mosaic_core::agent::{Agent, AgentId, AgentStatus};
use mosaic_core::config::StreamConfig;
use mosaic_core::math::{ease_in_out, fade_opacity};
use mosaic_core::task::{TaskOutcome, TaskReport};
use mosaic_core::FrameContext;
use mosaic_data::{AssetStore, Stage};
use mosaic_io::SourceCatalog;
use mosaic_lanes::asset_lane::{BitmapLoaderLane, LoadMetrics, LoadTask};
use mosaic_lanes::presentation_lane::{
    BackgroundTransition, IntroAnimation, LoadingCaption, ProgressIndicator, BACKGROUND,
    INTRO_ANIMATION, LOADING_CAPTION, PROGRESS_INDICATOR,
};
use mosaic_lanes::worker_lane::{completion_channel, WorkerPool};
use mosaic_telemetry::{GaugeHandle, MetricsRegistry};

use super::{GridLayout, IconEntry, PhaseState, PhaseTiming};

#[derive(Debug, Clone)]
struct SequencerMetrics {
    populated: GaugeHandle,
    spawned: GaugeHandle,
}

impl SequencerMetrics {
    fn register(registry: &MetricsRegistry) -> mosaic_core::telemetry::MetricsResult<Self> {
        Ok(Self {
            populated: registry.register_gauge(
                "sequencer",
                "populated",
                "Stream slots holding a decoded asset",
                "slots",
            )?,
            spawned: registry.register_gauge(
                "sequencer",
                "spawned",
                "Icons revealed on the grid",
                "icons",
            )?,
        })
    }
}

/// Orchestrates loading and the reveal phases.
pub struct PhaseSequencer {
    config: StreamConfig,
    store: Arc<AssetStore>,
    catalog: Arc<SourceCatalog>,
    lane: BitmapLoaderLane,
    pool: WorkerPool,
    completions: Receiver<TaskReport>,
    grid: GridLayout,
    started: bool,

    phase: PhaseState,
    phase_elapsed: f32,
    interval_elapsed: f32,
    timings: Vec<PhaseTiming>,
    transition_attempts: u32,

    total: usize,
    next_unscheduled: usize,
    retry_queue: VecDeque<usize>,
    attempts: Vec<u32>,
    in_flight: usize,
    ready_slots: VecDeque<usize>,
    populated_reported: usize,
    abandoned: Vec<usize>,

    icons: Vec<IconEntry>,
    progress: f32,
    opacity: u8,
    scroll_offset: f32,

    metrics: Option<SequencerMetrics>,
    load_metrics: Option<LoadMetrics>,
}

impl PhaseSequencer {
    /// Creates a sequencer over a preallocated store and its matching catalog.
    ///
    /// The total is the store's slot count. Metric registration failures are
    /// logged and leave the sequencer without metrics.
    pub fn new(
        config: StreamConfig,
        store: Arc<AssetStore>,
        catalog: Arc<SourceCatalog>,
        registry: &MetricsRegistry,
    ) -> Self {
        let total = store.slot_count();
        if catalog.len() != total {
            log::warn!(
                "Catalog lists {} files but the store has {} slots",
                catalog.len(),
                total
            );
        }

        let metrics = SequencerMetrics::register(registry)
            .map_err(|e| log::warn!("Sequencer metrics disabled: {}", e))
            .ok();
        let load_metrics = LoadMetrics::register(registry)
            .map_err(|e| log::warn!("Load metrics disabled: {}", e))
            .ok();

        let (listener, completions) = completion_channel();

        Self {
            lane: BitmapLoaderLane::downsampling(config.target_size),
            grid: GridLayout::from_config(&config.grid),
            config,
            store,
            catalog,
            pool: WorkerPool::new(listener),
            completions,
            started: false,
            phase: PhaseState::Streaming,
            phase_elapsed: 0.0,
            interval_elapsed: 0.0,
            timings: Vec::new(),
            transition_attempts: 0,
            total,
            next_unscheduled: 0,
            retry_queue: VecDeque::new(),
            attempts: vec![0; total],
            in_flight: 0,
            ready_slots: VecDeque::new(),
            populated_reported: 0,
            abandoned: Vec::new(),
            icons: Vec::new(),
            progress: 0.0,
            opacity: 0,
            scroll_offset: 0.0,
            metrics,
            load_metrics,
        }
    }

    /// Starts the worker pool and puts the loading visuals on stage.
    ///
    /// Calling it again is a no-op.
    pub fn start(&mut self, stage: &mut Stage) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.pool
            .start(self.config.worker_count)
            .context("Failed to start the worker pool")?;

        let art = &self.config.art;
        stage.add(
            Box::new(ProgressIndicator::new(art.progress_character.clone())),
            &*self.store,
        );
        stage.add(
            Box::new(LoadingCaption::new(
                art.caption.clone(),
                self.config.timing.caption_frame_secs,
            )),
            &*self.store,
        );

        self.started = true;
        log::info!(
            "PhaseSequencer started: {} assets, {} workers",
            self.total,
            self.config.worker_count
        );
        Ok(())
    }

    /// Advances the sequencer by one frame.
    pub fn tick(&mut self, delta_seconds: f32, stage: &mut Stage) {
        self.drain_completions();
        if !self.started || self.phase.is_terminal() {
            return;
        }

        self.phase_elapsed += delta_seconds;
        match self.phase {
            PhaseState::Streaming => self.tick_streaming(delta_seconds, stage),
            PhaseState::AwaitingIntroAnim => {
                stage.remove_by_name(PROGRESS_INDICATOR);
                stage.remove_by_name(LOADING_CAPTION);
                let timing = &self.config.timing;
                let intro = IntroAnimation::new(
                    self.config.art.intro_prefix.clone(),
                    self.config.art.intro_frames,
                    timing.intro_frame_secs,
                    timing.intro_hold_secs,
                );
                stage.add(Box::new(intro), &*self.store);
                self.advance();
            }
            PhaseState::IntroAnimPlaying => {
                let finished = match stage.find_by_name(INTRO_ANIMATION) {
                    Some(handle) => stage.get(handle).map_or(true, |e| e.is_complete()),
                    None => {
                        log::warn!("Intro animation left the stage early");
                        true
                    }
                };
                if finished {
                    stage.remove_by_name(INTRO_ANIMATION);
                    self.advance();
                }
            }
            PhaseState::AwaitingTransition => {
                let started = stage
                    .find_as_mut::<BackgroundTransition>(BACKGROUND)
                    .is_some_and(|background| background.start_transition());
                if started {
                    self.advance();
                } else {
                    self.transition_attempts += 1;
                    if self.transition_attempts == 1 {
                        log::warn!("Background transition unavailable; retrying every tick");
                    } else {
                        log::debug!("Background transition retry #{}", self.transition_attempts);
                    }
                }
            }
            PhaseState::TransitionPlaying => {
                if self.phase_elapsed >= self.config.timing.transition_secs {
                    self.advance();
                }
            }
            PhaseState::FadingIn => {
                let fade_elapsed = self.phase_elapsed - self.config.timing.fade_delay_secs;
                if fade_elapsed >= 0.0 {
                    self.set_opacity(fade_opacity(fade_elapsed, self.config.timing.fade_secs));
                    if self.opacity == u8::MAX {
                        self.advance();
                    }
                }
            }
            PhaseState::AwaitingScroll => {
                if self.phase_elapsed >= self.config.timing.scroll_delay_secs {
                    self.advance();
                }
            }
            PhaseState::Scrolling => {
                let duration = self.config.timing.scroll_secs;
                let t = if duration > 0.0 {
                    self.phase_elapsed / duration
                } else {
                    1.0
                };
                let eased = ease_in_out(t);
                self.set_scroll(eased * self.config.timing.scroll_distance);
                if eased >= 1.0 {
                    self.advance();
                }
            }
            PhaseState::Done => {}
        }
    }

    fn drain_completions(&mut self) {
        while let Ok(report) = self.completions.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            match report.outcome {
                TaskOutcome::Completed => {
                    self.populated_reported += 1;
                    self.ready_slots.push_back(report.target);
                }
                TaskOutcome::Failed(reason) => self.handle_failure(report.target, &reason),
            }
        }
    }

    fn handle_failure(&mut self, target: usize, reason: &str) {
        let attempts = self.attempts.get(target).copied().unwrap_or(u32::MAX);
        if attempts <= self.config.retry_limit {
            log::debug!("Retrying slot {} (attempt {} failed: {})", target, attempts, reason);
            self.retry_queue.push_back(target);
        } else {
            log::warn!(
                "Abandoning slot {} after {} attempts: {}",
                target,
                attempts,
                reason
            );
            self.abandoned.push(target);
        }
    }

    fn tick_streaming(&mut self, delta_seconds: f32, stage: &mut Stage) {
        self.interval_elapsed += delta_seconds;
        let interval = self.config.tick_interval_ms as f32 / 1000.0;
        if self.interval_elapsed < interval {
            return;
        }
        self.interval_elapsed = 0.0;

        self.spawn_ready_icons();
        self.schedule_loads();

        self.progress = if self.total == 0 {
            1.0
        } else {
            self.store.populated_count() as f32 / self.total as f32
        };
        if let Some(indicator) = stage.find_as_mut::<ProgressIndicator>(PROGRESS_INDICATOR) {
            indicator.set_progress(self.progress);
        }
        if let Some(metrics) = &self.metrics {
            let _ = metrics.populated.set(self.store.populated_count() as f64);
            let _ = metrics.spawned.set(self.icons.len() as f64);
        }

        if self.is_loading_complete() {
            log::info!(
                "Loading complete: {} populated, {} abandoned",
                self.populated_reported,
                self.abandoned.len()
            );
            self.pool.shutdown();
            self.advance();
        }
    }

    fn spawn_ready_icons(&mut self) {
        let ready = self
            .store
            .populated_count()
            .saturating_sub(self.icons.len())
            .min(self.ready_slots.len())
            .min(self.config.spawn_batch);

        if ready > 0 {
            log::debug!("Spawning {} icons ({} already on the grid)", ready, self.icons.len());
        }
        for _ in 0..ready {
            let Some(slot) = self.ready_slots.pop_front() else {
                break;
            };
            let Some(asset) = self.store.slot(slot) else {
                log::error!("Slot {} was reported loaded but is empty", slot);
                continue;
            };
            let id = self.icons.len();
            let (grid_column, grid_row) = self.grid.cell(id);
            let base_position = self.grid.position(grid_column, grid_row);
            self.icons.push(IconEntry {
                id,
                slot,
                grid_column,
                grid_row,
                opacity: 0,
                base_position,
                position: base_position,
                asset,
            });
        }
    }

    fn schedule_loads(&mut self) {
        let before = self.in_flight;
        for _ in 0..self.config.load_batch {
            let target = match self.retry_queue.pop_front() {
                Some(target) => target,
                None if self.next_unscheduled < self.total => {
                    self.next_unscheduled += 1;
                    self.next_unscheduled - 1
                }
                None => break,
            };

            let mut task = LoadTask::new(
                target,
                Arc::clone(&self.catalog),
                Arc::clone(&self.store),
                self.lane,
            );
            if let Some(metrics) = &self.load_metrics {
                task = task.with_metrics(metrics.clone());
            }

            if let Err(e) = self.pool.schedule(Box::new(task)) {
                log::error!("Could not schedule slot {}: {}", target, e);
                self.retry_queue.push_front(target);
                break;
            }
            if let Some(attempts) = self.attempts.get_mut(target) {
                *attempts += 1;
            }
            self.in_flight += 1;
        }
        if self.in_flight > before {
            log::debug!(
                "Scheduled {} loads ({} of {} indices handed out)",
                self.in_flight - before,
                self.next_unscheduled,
                self.total
            );
        }
    }

    fn is_loading_complete(&self) -> bool {
        self.populated_reported + self.abandoned.len() == self.total
            && self.ready_slots.is_empty()
            && self.in_flight == 0
    }

    fn advance(&mut self) {
        let next = self.phase.next();
        debug_assert!(next > self.phase || next.is_terminal());
        self.timings.push(PhaseTiming {
            phase: self.phase,
            seconds: self.phase_elapsed,
        });
        log::info!("Phase {} -> {} ({:.2}s)", self.phase, next, self.phase_elapsed);
        self.phase = next;
        self.phase_elapsed = 0.0;
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
        for icon in &mut self.icons {
            icon.opacity = opacity;
        }
    }

    fn set_scroll(&mut self, offset: f32) {
        self.scroll_offset = offset;
        for icon in &mut self.icons {
            icon.apply_scroll(offset);
        }
    }

    /// The current phase.
    pub fn phase(&self) -> PhaseState {
        self.phase
    }

    /// Whether the run reached [`PhaseState::Done`].
    pub fn is_done(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Spawned icons in spawn order.
    pub fn icons(&self) -> &[IconEntry] {
        &self.icons
    }

    /// Number of spawned icons.
    pub fn spawned_count(&self) -> usize {
        self.icons.len()
    }

    /// Number of populated store slots.
    pub fn populated_count(&self) -> usize {
        self.store.populated_count()
    }

    /// Slots given up on after exhausting their retries.
    pub fn abandoned(&self) -> &[usize] {
        &self.abandoned
    }

    /// Number of streamed slots.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Loads scheduled but not yet reported.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Loading progress last shown on the indicator.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Current icon opacity.
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Current vertical scroll offset.
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Time spent in each phase already left.
    pub fn phase_timings(&self) -> &[PhaseTiming] {
        &self.timings
    }
}

impl Agent for PhaseSequencer {
    fn id(&self) -> AgentId {
        AgentId::Sequencer
    }

    fn update(&mut self, context: &mut FrameContext<'_>) {
        let delta_seconds = context.delta_seconds;
        match context
            .stage
            .as_deref_mut()
            .and_then(|stage| stage.downcast_mut::<Stage>())
        {
            Some(stage) => self.tick(delta_seconds, stage),
            None => log::warn!("PhaseSequencer updated without a stage"),
        }
    }

    fn report_status(&self) -> AgentStatus {
        let health_score = if self.total == 0 {
            1.0
        } else {
            1.0 - self.abandoned.len() as f32 / self.total as f32
        };

        AgentStatus {
            agent_id: self.id(),
            health_score,
            is_stalled: self.phase == PhaseState::AwaitingTransition
                && self.transition_attempts > 0,
            message: format!(
                "phase={} populated={}/{} spawned={} abandoned={} in_flight={}",
                self.phase,
                self.store.populated_count(),
                self.total,
                self.icons.len(),
                self.abandoned.len(),
                self.in_flight
            ),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
