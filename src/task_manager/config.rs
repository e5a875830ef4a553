use serde::{Deserialize, Serialize};

/// Configuration for task manager behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskManagerConfig {
    /// Slots reserved up front for the active set
    pub initial_capacity: usize,
    /// Log a warning whenever the active set grows past this size (0 = never)
    pub active_task_warn_threshold: usize,
}

impl Default for TaskManagerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            active_task_warn_threshold: 0,
        }
    }
}
