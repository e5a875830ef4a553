// Task Manager Module - A frame-driven cooperative task scheduler
//
// This module provides single-threaded task scheduling with the following features:
// - Explicit task state machine (init, running, paused, stopped, finished)
// - Ordered subscriber lists for every lifecycle event
// - Pluggable per-variant behaviour (delay by seconds, delay by frames, custom)
// - Back-to-front swap-remove tick scan that tolerates mutation mid-iteration
// - Control by id and lifetime statistics

pub mod types;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod config;
pub mod behavior;
pub mod handle;
pub mod registry;
pub mod manager;

// Re-export commonly used types for convenience
pub use types::{
    TaskId, TaskState, TaskManagerStats, TaskCallback, TaskUpdateCallback,
    TaskFinishCallback, allocate_task_id,
};

pub use error::TaskError;
pub use logging::TaskLoggingContext;
pub use metrics::TaskMetrics;
pub use config::TaskManagerConfig;
pub use behavior::{Custom, DelayFrames, DelaySeconds, Step, TaskBehavior};
pub use handle::Task;
pub use registry::TaskRegistry;
pub use manager::TaskManager;

#[cfg(test)]
mod tests;
