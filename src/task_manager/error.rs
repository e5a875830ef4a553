use crate::task_manager::types::{TaskId, TaskState};

/// Rejected task state transitions.
///
/// The fluent task API logs these and carries on; the `try_*` variants hand
/// them back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task {id} cannot be started again (state: {state})")]
    AlreadyStarted { id: TaskId, state: TaskState },

    #[error("task {id} cannot move from {from} to {to}")]
    IllegalTransition {
        id: TaskId,
        from: TaskState,
        to: TaskState,
    },
}

impl TaskError {
    pub fn task_id(&self) -> TaskId {
        match self {
            TaskError::AlreadyStarted { id, .. } | TaskError::IllegalTransition { id, .. } => *id,
        }
    }
}
