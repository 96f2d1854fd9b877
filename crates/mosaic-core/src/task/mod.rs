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

//! Contracts for units of background work and their completion notifications.
//!
//! A [`Task`] is bound to a single target index and consumed exactly once by a
//! worker. Whatever happens inside it, the worker produces a [`TaskReport`] and
//! hands it to the registered [`ExecutionListener`].

use std::fmt;

/// The result of running a task to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task produced its output and published it.
    Completed,
    /// The task gave up. The message describes why.
    Failed(String),
}

impl TaskOutcome {
    /// Returns `true` for [`TaskOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed)
    }
}

/// A completion notification emitted once per executed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// The index the task was bound to.
    pub target: usize,
    /// What happened.
    pub outcome: TaskOutcome,
}

impl TaskReport {
    /// A successful report for `target`.
    pub fn completed(target: usize) -> Self {
        Self {
            target,
            outcome: TaskOutcome::Completed,
        }
    }

    /// A failed report for `target`.
    pub fn failed(target: usize, reason: impl Into<String>) -> Self {
        Self {
            target,
            outcome: TaskOutcome::Failed(reason.into()),
        }
    }
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            TaskOutcome::Completed => write!(f, "task #{} completed", self.target),
            TaskOutcome::Failed(reason) => write!(f, "task #{} failed: {}", self.target, reason),
        }
    }
}

/// An opaque unit of work executed on a background thread.
pub trait Task: Send + 'static {
    /// The index this task is bound to. Used to report completion even if
    /// `execute` panics.
    fn target(&self) -> usize;

    /// Runs the task to completion. Must not block on the orchestrating thread.
    fn execute(self: Box<Self>) -> TaskReport;
}

/// Receives one notification per finished task.
///
/// Called on the worker thread that ran the task, never on the orchestrating
/// thread. Implementations should hand the report off rather than mutate
/// orchestration state in place.
pub trait ExecutionListener: Send + Sync + 'static {
    /// Called after a task finished, successfully or not.
    fn on_task_finished(&self, report: TaskReport);
}
