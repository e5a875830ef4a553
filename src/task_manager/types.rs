use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process-wide id counter shared by every task manager
static TASK_ID_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Allocate the next task id. The first id handed out is 1.
pub fn allocate_task_id() -> TaskId {
    TaskId(next_id(&TASK_ID_COUNTER))
}

/// Pre-increment `counter`, wrapping to 0 after `u32::MAX`
fn next_id(counter: &AtomicU32) -> u32 {
    let id = counter.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
    if id == 0 {
        tracing::warn!("Task id space exhausted, ids wrap around");
    }
    id
}

/// Unique identifier for tasks
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TaskId(u32);

impl TaskId {
    /// Get the raw numeric value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for TaskId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Init,
    Running,
    Paused,
    Stopped,
    Finished,
}

impl TaskState {
    pub const ALL: [TaskState; 5] = [
        TaskState::Init,
        TaskState::Running,
        TaskState::Paused,
        TaskState::Stopped,
        TaskState::Finished,
    ];

    /// Stopped and Finished are terminal
    pub fn is_over(&self) -> bool {
        matches!(self, TaskState::Stopped | TaskState::Finished)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Init => write!(f, "init"),
            TaskState::Running => write!(f, "running"),
            TaskState::Paused => write!(f, "paused"),
            TaskState::Stopped => write!(f, "stopped"),
            TaskState::Finished => write!(f, "finished"),
        }
    }
}

/// Subscriber signatures for task lifecycle events
pub type TaskCallback = std::rc::Rc<dyn Fn()>;
pub type TaskUpdateCallback = std::rc::Rc<dyn Fn(f32)>;
pub type TaskFinishCallback = std::rc::Rc<dyn Fn(bool)>;

/// Statistics for task manager monitoring
#[derive(Debug, Clone)]
pub struct TaskManagerStats {
    pub active_tasks: usize,
    pub tasks_by_state: HashMap<TaskState, usize>,
    pub ticks: u64,
    pub tasks_started: u64,
    pub tasks_finished: u64,
    pub tasks_stopped: u64,
    pub tasks_reaped: u64,
}
