//! # Task Management System
//!
//! This module provides the worker pool used for background chunk generation.
//!
//! ## Architecture Overview
//!
//! The task management system consists of several key components:
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the owning thread and a worker
//!
//! Each worker is a `std::thread` with a dedicated pair of `mpsc` channels: one
//! carrying tasks in, one carrying results back.
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back results
//! 4. Results are applied on the owning thread in `process_completed_tasks()`,
//!    which is the only place the chunk manager is mutated
//! 5. Results can spawn new tasks
//!
//! Tasks that cannot be handed to a worker wait in a FIFO queue. Queued tasks
//! can be cancelled with `cancel_queued()`; tasks already sent to a worker
//! always run to completion.
//!
//! ## Example Usage
//! ```no_run
//! use voxel_world::{ChunkManager, TaskManager, WorldConfig};
//!
//! let mut world = ChunkManager::new(&WorldConfig::default()).unwrap();
//! let mut task_manager = TaskManager::new(4);
//!
//! // In the frame loop:
//! task_manager.process_completed_tasks(&mut world);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use std::{
    collections::VecDeque,
    sync::mpsc::{channel, Receiver, Sender},
    thread::{self, JoinHandle},
};

use cgmath::Point3;
use log::{debug, info};
use task::{Task, TaskResult};

use crate::engine_state::voxels::chunk_manager::ChunkManager;

/// A communication channel between the owning thread and one worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tasks sent but not yet returned
/// - `_worker`: Handle to the worker thread
///
/// Dropping the channel closes `task_sender`, which ends the worker's loop.
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: One channel per worker
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 leaves everything else in the cancellable queue.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a manager with `num_workers` worker threads.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "Starting {num_workers} workers (available parallelism: {:?})",
            thread::available_parallelism()
        );
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Tasks waiting for a worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Tasks sent to a worker whose results have not been processed yet.
    pub fn in_flight_count(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Whether no task is queued or running.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight_count() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// Returns the task back if the worker has disconnected.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// Returns `true` if the task went straight to a worker and `false` if it
    /// was queued because every worker is busy.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to workers, oldest first, until the queue is empty or
    /// every worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Worker is gone; keep the task for later and stop.
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Drops every queued task for which `should_cancel` returns true and
    /// returns the targets of the dropped tasks.
    pub fn cancel_queued(
        &mut self,
        mut should_cancel: impl FnMut(&dyn Task) -> bool,
    ) -> Vec<Point3<i32>> {
        let mut cancelled = Vec::new();
        self.queued_tasks.retain(|task| {
            if should_cancel(task.as_ref()) {
                cancelled.extend(task.target());
                false
            } else {
                true
            }
        });
        if !cancelled.is_empty() {
            debug!("Cancelled {} queued tasks", cancelled.len());
        }
        cancelled
    }

    /// Applies every result that has arrived from the workers.
    ///
    /// Must be called from the owning thread. Follow-up tasks returned by the
    /// results are published. Returns the targets of the completed tasks.
    pub fn process_completed_tasks(&mut self, world: &mut ChunkManager) -> Vec<Point3<i32>> {
        let mut tasks_to_queue = Vec::new();
        let mut completed = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                completed.extend(result.target());
                tasks_to_queue.extend(result.handle_result(world));
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        completed
    }
}
