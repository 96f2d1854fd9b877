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

//! Traits for autonomous subsystems (Agents) driven once per frame by the host.

use crate::FrameContext;
use std::any::Any;
use std::fmt;

/// Unique identifier for agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentId {
    /// The agent that streams assets and sequences the reveal.
    Sequencer,
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A snapshot of an agent's health, reported on demand.
#[derive(Debug, Clone)]
pub struct AgentStatus {
    /// The reporting agent.
    pub agent_id: AgentId,
    /// `0.0` (failing) to `1.0` (healthy).
    pub health_score: f32,
    /// Whether the agent believes it can no longer make progress.
    pub is_stalled: bool,
    /// Free-form details.
    pub message: String,
}

/// The foundational interface for a frame-driven subsystem.
pub trait Agent: Send {
    /// Returns the unique identifier for this agent.
    fn id(&self) -> AgentId;

    /// Advances the agent by one frame.
    fn update(&mut self, context: &mut FrameContext<'_>);

    /// Reports the current status and health of the agent.
    fn report_status(&self) -> AgentStatus;

    /// Allows downcasting to concrete agent types.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to concrete agent types.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
