//! # Task Management System
//!
//! This module provides a cross-platform task management system for executing work
//! asynchronously across multiple threads (native) or using web workers (WASM).
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the consuming thread and one worker
//!
//! ## Platform-Specific Behavior
//!
//! - **Native**: `std::thread` workers, one dedicated channel pair each
//! - **Web**: `wasm_thread` workers backed by Web Workers
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back results
//! 4. Results are handled on the consuming thread in `process_completed_tasks()`
//! 5. Results can spawn new tasks
//!
//! ## Shutdown
//! A panic inside `Task::process` is caught on the worker and reported as an
//! error-logging result, so the worker keeps serving its channel.
//!
//! Dropping the `TaskManager` closes every task channel. Each worker finishes the
//! task it is running, drains what was already sent to it, and exits on its own;
//! the manager then joins every worker thread. Workers are never killed.
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut task_manager = TaskManager::new(4);
//!
//! // Publish a task for background processing
//! task_manager.publish_task(Box::new(MyTask::new(...)));
//!
//! // In your main/game loop:
//! task_manager.process_completed_tasks();
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use log::{debug, error, info};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use task::{Task, TaskResult};

#[cfg(target_family = "wasm")]
mod wasm_imports {
    pub use wasm_thread as thread;
    pub use wasm_thread::JoinHandle;
}

#[cfg(target_family = "wasm")]
use self::wasm_imports::*;

#[cfg(not(target_family = "wasm"))]
use std::thread::{self, JoinHandle};

/// A communication channel between the consuming thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the consuming thread to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined on shutdown
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Stands in for the result of a task whose `process()` panicked.
///
/// The worker survives the panic; handling this result frees its slot.
struct PanickedTaskResult {
    message: String,
}

impl TaskResult for PanickedTaskResult {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
        error!("Task panicked on a worker: {}", self.message);
        Vec::new()
    }
}

/// Extracts the message of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting and processing task results
/// - Handling task queuing when all workers are busy
/// - Shutting workers down and joining them when dropped
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 so a busy worker never has a backlog; waiting tasks stay
/// in the manager's queue where any worker can pick them up.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. With zero workers every
    ///   published task stays queued.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} mesh workers (available parallelism: {:?})",
            num_workers,
            std::thread::available_parallelism()
        );

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| task.process()))
                        .unwrap_or_else(|payload| -> Box<dyn TaskResult + Send> {
                            Box::new(PanickedTaskResult {
                                message: panic_message(payload.as_ref()),
                            })
                        });
                    let _ = result_tx.send(result);
                }
            };

            let worker = thread::spawn(task_closure);

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (worker disconnected), handing the task back
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

    /// Finds an available worker channel that can accept a new task.
    ///
    /// Round-robin starting from the channel after the last one used; channels at
    /// `MAX_TASKS_IN_FLIGHT` are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel % self.channels.len();
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
    /// The task is sent to a worker right away if one is free, or queued otherwise.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
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

    /// Processes any queued tasks if workers are available.
    ///
    /// Call this once per frame. Tasks are sent in FIFO order until the queue is
    /// empty or every worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Handles all completed task results from worker threads.
    ///
    /// Must be called on the consuming thread. Follow-up tasks returned by the
    /// results are published before returning.
    ///
    /// # Returns
    /// Number of results handled.
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                handled += 1;
                tasks_to_queue.extend(result.handle_result());
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }

        handled
    }

    /// Number of tasks sent to workers whose results have not been handled yet.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_len(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        if !self.queued_tasks.is_empty() {
            debug!(
                "Discarding {} queued tasks on shutdown",
                self.queued_tasks.len()
            );
            self.queued_tasks.clear();
        }

        for TaskChannel {
            task_sender,
            result_receiver,
            worker,
            ..
        } in self.channels.drain(..)
        {
            // Closing the sender ends the worker's receive loop once its
            // already-sent tasks are done.
            drop(task_sender);
            if worker.join().is_err() {
                error!("Mesh worker panicked before shutdown");
            }
            drop(result_receiver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use std::time::{Duration, Instant};

    struct CountTask {
        processed: Arc<AtomicUsize>,
        follow_up: bool,
    }

    struct CountResult {
        processed: Arc<AtomicUsize>,
        follow_up: bool,
    }

    impl Task for CountTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            self.processed.fetch_add(1, Ordering::SeqCst);
            Box::new(CountResult {
                processed: self.processed.clone(),
                follow_up: self.follow_up,
            })
        }
    }

    impl TaskResult for CountResult {
        fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>> {
            if self.follow_up {
                vec![Box::new(CountTask {
                    processed: self.processed,
                    follow_up: false,
                })]
            } else {
                Vec::new()
            }
        }
    }

    fn pump_until(manager: &mut TaskManager, done: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() {
            assert!(Instant::now() < deadline, "tasks did not finish in time");
            manager.process_completed_tasks();
            manager.process_queued_tasks();
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn extra_tasks_are_queued_until_a_worker_frees_up() {
        let processed = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(1);

        let first = manager.publish_task(Box::new(CountTask {
            processed: processed.clone(),
            follow_up: false,
        }));
        let second = manager.publish_task(Box::new(CountTask {
            processed: processed.clone(),
            follow_up: false,
        }));
        assert!(first);
        assert!(!second);
        assert_eq!(manager.queued_len(), 1);

        pump_until(&mut manager, || processed.load(Ordering::SeqCst) == 2);
        assert_eq!(manager.queued_len(), 0);
    }

    #[test]
    fn follow_up_tasks_are_published() {
        let processed = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(2);
        manager.publish_task(Box::new(CountTask {
            processed: processed.clone(),
            follow_up: true,
        }));

        pump_until(&mut manager, || processed.load(Ordering::SeqCst) == 2);
    }

    struct PanicTask;

    impl Task for PanicTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            panic!("collaborator failed");
        }
    }

    #[test]
    fn panicking_task_frees_its_worker() {
        let processed = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(1);
        assert!(manager.publish_task(Box::new(PanicTask)));
        manager.publish_task(Box::new(CountTask {
            processed: processed.clone(),
            follow_up: false,
        }));

        pump_until(&mut manager, || processed.load(Ordering::SeqCst) == 1);
        let deadline = Instant::now() + Duration::from_secs(5);
        while manager.tasks_in_flight() > 0 {
            assert!(Instant::now() < deadline, "result never came back");
            manager.process_completed_tasks();
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(manager.queued_len(), 0);
    }

    #[test]
    fn panic_messages_are_extracted() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }

    #[test]
    fn zero_workers_keeps_everything_queued() {
        let mut manager = TaskManager::new(0);
        let sent = manager.publish_task(Box::new(CountTask {
            processed: Arc::new(AtomicUsize::new(0)),
            follow_up: false,
        }));
        assert!(!sent);
        manager.process_queued_tasks();
        assert_eq!(manager.queued_len(), 1);
    }

    #[test]
    fn drop_lets_sent_tasks_finish_and_joins_workers() {
        let processed = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(3);
        for _ in 0..3 {
            manager.publish_task(Box::new(CountTask {
                processed: processed.clone(),
                follow_up: false,
            }));
        }
        drop(manager);
        assert_eq!(processed.load(Ordering::SeqCst), 3);
    }
}
