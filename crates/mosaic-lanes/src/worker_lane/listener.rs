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

//! A listener that forwards completions to the orchestrating thread.

use crossbeam_channel::{Receiver, Sender};
use mosaic_core::task::{ExecutionListener, TaskReport};
use std::sync::Arc;

/// Forwards every [`TaskReport`] into a channel.
///
/// Workers only send; the owner of the receiver drains it on its own thread,
/// so no orchestration state is ever mutated from a worker.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: Sender<TaskReport>,
}

impl ChannelListener {
    /// Wraps an existing sender.
    pub fn new(sender: Sender<TaskReport>) -> Self {
        Self { sender }
    }
}

impl ExecutionListener for ChannelListener {
    fn on_task_finished(&self, report: TaskReport) {
        if self.sender.send(report).is_err() {
            log::trace!("Completion receiver dropped; discarding report");
        }
    }
}

/// Creates an unbounded completion channel and its listener.
pub fn completion_channel() -> (Arc<ChannelListener>, Receiver<TaskReport>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (Arc::new(ChannelListener::new(tx)), rx)
}
