use crate::task_manager::types::TaskId;
use tracing::{Span, field};

/// Logging context for task operations
#[derive(Debug, Clone)]
pub struct TaskLoggingContext {
    pub task_id: TaskId,
    pub task_kind: &'static str,
    pub operation: &'static str,
}

impl TaskLoggingContext {
    pub fn new(task_id: TaskId, task_kind: &'static str, operation: &'static str) -> Self {
        Self {
            task_id,
            task_kind,
            operation,
        }
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "task_operation",
            task_id = %self.task_id,
            task_kind = self.task_kind,
            operation = self.operation,
            result = field::Empty,
        )
    }
}

/// Span covering one scheduler pass
pub fn tick_span(tick: u64, delta_time: f32, active_tasks: usize) -> Span {
    tracing::debug_span!(
        "task_tick",
        tick = tick,
        delta_time = delta_time,
        active_tasks = active_tasks,
        reaped = field::Empty,
    )
}
