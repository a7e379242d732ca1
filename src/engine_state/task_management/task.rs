//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which provides a framework for executing work asynchronously across multiple threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the consuming thread
//! 5. The result can spawn new tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the consuming thread

/// A trait representing a unit of work that can be executed asynchronously.
///
/// Tasks are the primary mechanism for offloading work from the consuming thread to
/// background workers. They should own (or hold shared handles to) all the data
/// they need, and must be `'static`.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// This runs on a background thread and always runs to completion; there is
    /// no cancellation point inside a task.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// A trait representing the result of processing a `Task`.
///
/// Results are handled on the consuming thread in
/// `TaskManager::process_completed_tasks`, so `handle_result` should stay cheap.
pub trait TaskResult: Send {
    /// Handles the result of a completed task.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (can be empty).
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task + Send>>;
}
