use crate::task_manager::handle::Task;
use crate::task_manager::types::{TaskId, TaskState};

/// Active-task storage for the scheduler scan.
///
/// Slots are unordered. A slot may be cleared to `None` while a tick is in
/// progress so the indices the scan relies on stay put; cleared slots are
/// swap-removed by the scan itself.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    slots: Vec<Option<Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Append a task at the end of the slot list
    pub fn push(&mut self, task: Task) {
        self.slots.push(Some(task));
    }

    /// Index of the first slot holding `id`
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|task| task.id() == id))
    }

    /// Get task by ID
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.position(id).and_then(|index| self.slots[index].as_ref())
    }

    /// Raw slot access for the tick scan
    pub fn slot(&self, index: usize) -> Option<&Option<Task>> {
        self.slots.get(index)
    }

    /// Empty a slot without moving any other slot
    pub fn clear_slot(&mut self, index: usize) -> Option<Task> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// O(1) removal: the last slot takes the place of `index`
    pub fn swap_remove(&mut self, index: usize) -> Option<Task> {
        if index < self.slots.len() {
            self.slots.swap_remove(index)
        } else {
            None
        }
    }

    /// Number of slots, cleared ones included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding a task
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Get all tasks
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.slots.iter().flatten()
    }

    /// Get tasks by state
    pub fn tasks_by_state(&self, state: TaskState) -> Vec<&Task> {
        self.all_tasks().filter(|task| task.state() == state).collect()
    }

    /// Get all task IDs
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.all_tasks().map(Task::id).collect()
    }
}
