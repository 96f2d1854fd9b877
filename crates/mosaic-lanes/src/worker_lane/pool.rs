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

//! A fixed-size pool of worker threads fed by a shared FIFO queue.

use crossbeam_channel::{Receiver, Sender};
use mosaic_core::task::{ExecutionListener, Task, TaskReport};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

type Job = Box<dyn Task>;

/// Errors raised by [`WorkerPool`].
#[derive(Debug, Error)]
pub enum PoolError {
    /// `start` was asked for zero workers.
    #[error("worker count must be greater than zero")]
    NoWorkers,
    /// `start` was called on a running pool.
    #[error("worker pool is already running with {0} workers")]
    AlreadyRunning(usize),
    /// `schedule` was called before `start` or after `shutdown`.
    #[error("worker pool is not running")]
    NotRunning,
    /// The OS refused to create a thread.
    #[error("failed to spawn worker thread")]
    Spawn(#[source] std::io::Error),
}

/// Runs tasks on a fixed set of threads.
///
/// Tasks are dequeued in FIFO order by whichever worker is free. Every task
/// produces exactly one report to the listener, even if it panics. Shutdown
/// drains the queue before joining.
pub struct WorkerPool {
    listener: Arc<dyn ExecutionListener>,
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    scheduled: AtomicUsize,
}

impl WorkerPool {
    /// Creates a stopped pool reporting to `listener`.
    pub fn new(listener: Arc<dyn ExecutionListener>) -> Self {
        Self {
            listener,
            sender: None,
            workers: Vec::new(),
            scheduled: AtomicUsize::new(0),
        }
    }

    /// Spawns `worker_count` threads.
    pub fn start(&mut self, worker_count: usize) -> Result<(), PoolError> {
        if worker_count == 0 {
            return Err(PoolError::NoWorkers);
        }
        if self.is_running() {
            return Err(PoolError::AlreadyRunning(self.workers.len()));
        }

        let (tx, rx) = crossbeam_channel::unbounded::<Job>();
        for index in 0..worker_count {
            let receiver = rx.clone();
            let listener = Arc::clone(&self.listener);
            let handle = thread::Builder::new()
                .name(format!("mosaic-worker-{index}"))
                .spawn(move || worker_loop(index, receiver, listener));

            match handle {
                Ok(handle) => self.workers.push(handle),
                Err(e) => {
                    // Let the threads already spawned exit cleanly.
                    drop(tx);
                    self.join_all();
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        self.sender = Some(tx);
        log::info!("Worker pool started with {} threads", worker_count);
        Ok(())
    }

    /// Enqueues `task`. Never blocks.
    pub fn schedule(&self, task: Box<dyn Task>) -> Result<(), PoolError> {
        let sender = self.sender.as_ref().ok_or(PoolError::NotRunning)?;
        sender.send(task).map_err(|_| PoolError::NotRunning)?;
        self.scheduled.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Whether the pool accepts tasks.
    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// The number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Total tasks accepted since creation.
    pub fn scheduled_total(&self) -> usize {
        self.scheduled.load(Ordering::Relaxed)
    }

    /// Stops accepting work, lets the workers drain the queue, then joins them.
    pub fn shutdown(&mut self) {
        if self.sender.take().is_none() && self.workers.is_empty() {
            return;
        }
        self.join_all();
        log::info!("Worker pool shut down");
    }

    fn join_all(&mut self) {
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_owned();
            if handle.join().is_err() {
                log::error!("{} terminated abnormally", name);
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(index: usize, receiver: Receiver<Job>, listener: Arc<dyn ExecutionListener>) {
    log::debug!("Worker {} started", index);

    for task in receiver.iter() {
        let target = task.target();
        let report = panic::catch_unwind(AssertUnwindSafe(move || task.execute()))
            .unwrap_or_else(|_| {
                log::error!("Task #{} panicked on worker {}", target, index);
                TaskReport::failed(target, "task panicked")
            });
        listener.on_task_finished(report);
    }

    log::debug!("Worker {} exiting", index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker_lane::completion_channel;

    struct Echo(usize);

    impl Task for Echo {
        fn target(&self) -> usize {
            self.0
        }

        fn execute(self: Box<Self>) -> TaskReport {
            TaskReport::completed(self.0)
        }
    }

    #[test]
    fn schedule_before_start_is_rejected() {
        let (listener, _rx) = completion_channel();
        let pool = WorkerPool::new(listener);
        assert!(matches!(pool.schedule(Box::new(Echo(0))), Err(PoolError::NotRunning)));
    }

    #[test]
    fn start_validates_arguments() {
        let (listener, _rx) = completion_channel();
        let mut pool = WorkerPool::new(listener);

        assert!(matches!(pool.start(0), Err(PoolError::NoWorkers)));
        pool.start(2).unwrap();
        assert!(matches!(pool.start(2), Err(PoolError::AlreadyRunning(2))));
        assert_eq!(pool.worker_count(), 2);
    }

    #[test]
    fn shutdown_drains_queue() {
        let (listener, rx) = completion_channel();
        let mut pool = WorkerPool::new(listener);
        pool.start(1).unwrap();
        for i in 0..10 {
            pool.schedule(Box::new(Echo(i))).unwrap();
        }
        pool.shutdown();

        let mut targets: Vec<usize> = rx.try_iter().map(|r| r.target).collect();
        targets.sort_unstable();
        assert_eq!(targets, (0..10).collect::<Vec<_>>());
        assert_eq!(pool.scheduled_total(), 10);
        assert!(!pool.is_running());
    }
}
