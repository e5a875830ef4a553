use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::task_manager::behavior::{Custom, DelayFrames, DelaySeconds, TaskBehavior};
use crate::task_manager::config::TaskManagerConfig;
use crate::task_manager::handle::Task;
use crate::task_manager::logging::tick_span;
use crate::task_manager::metrics::TaskMetrics;
use crate::task_manager::registry::TaskRegistry;
use crate::task_manager::types::{TaskId, TaskManagerStats, TaskState, allocate_task_id};

/// State shared between a manager and the tasks it created
pub(crate) struct ManagerShared {
    registry: RefCell<TaskRegistry>,
    metrics: RefCell<TaskMetrics>,
    ticking: Cell<bool>,
    config: TaskManagerConfig,
}

impl ManagerShared {
    pub(crate) fn register_task(&self, task: &Task) {
        let active = {
            let mut registry = self.registry.borrow_mut();
            registry.push(task.clone());
            registry.live_count()
        };
        self.metrics.borrow_mut().record_start();

        let threshold = self.config.active_task_warn_threshold;
        if threshold > 0 && active > threshold {
            tracing::warn!(
                active_tasks = active,
                threshold = threshold,
                "Active task count above threshold"
            );
        }
    }

    /// Removes `task` from the active set; absent tasks are ignored.
    pub(crate) fn unregister_task(&self, task: &Task) {
        let removed = {
            let mut registry = self.registry.borrow_mut();
            match registry.position(task.id()) {
                // the running scan owns slot order until it is done
                Some(index) if self.ticking.get() => registry.clear_slot(index),
                Some(index) => registry.swap_remove(index),
                None => None,
            }
        };

        if removed.is_some() {
            let mut metrics = self.metrics.borrow_mut();
            match task.state() {
                TaskState::Stopped => metrics.record_stop(),
                _ => metrics.record_finish(),
            }
        }
    }
}

/// Resets the ticking flag even if a callback unwinds
pub(crate) struct TickGuard<'a>(pub(crate) &'a Cell<bool>);

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Owns the live tasks and drives them once per frame.
///
/// Cloning yields another handle to the same manager.
#[derive(Clone)]
pub struct TaskManager {
    shared: Rc<ManagerShared>,
}

impl TaskManager {
    /// Create a new TaskManager with default configuration
    pub fn new() -> Self {
        Self::with_config(TaskManagerConfig::default())
    }

    /// Create a new TaskManager with custom configuration
    pub fn with_config(config: TaskManagerConfig) -> Self {
        tracing::info!(
            initial_capacity = config.initial_capacity,
            "Task manager initialized"
        );
        Self {
            shared: Rc::new(ManagerShared {
                registry: RefCell::new(TaskRegistry::with_capacity(config.initial_capacity)),
                metrics: RefCell::new(TaskMetrics::new()),
                ticking: Cell::new(false),
                config,
            }),
        }
    }

    pub fn config(&self) -> &TaskManagerConfig {
        &self.shared.config
    }

    // Task construction

    /// A task that only ends through `finish()` or `stop()`
    pub fn create_task(&self) -> Task {
        self.create_task_with(Custom)
    }

    /// A task that finishes after `seconds` of accumulated tick time
    pub fn delay_seconds(&self, seconds: f32) -> Task {
        self.create_task_with(DelaySeconds::new(seconds))
    }

    /// A task that finishes after `frames` ticks
    pub fn delay_frames(&self, frames: u32) -> Task {
        self.create_task_with(DelayFrames::new(frames))
    }

    /// A task driven by a caller-supplied behaviour
    pub fn create_task_with(&self, behavior: impl TaskBehavior + 'static) -> Task {
        Task::new(allocate_task_id(), Rc::downgrade(&self.shared), Box::new(behavior))
    }

    // Driving loop

    /// Advance every live task by one frame.
    ///
    /// The active set is scanned from the back. Terminal tasks and slots
    /// emptied mid-tick are swap-removed on the spot; the element swapped in
    /// was either visited already or appended during this tick, so it is not
    /// looked at again. Tasks may start, stop or finish any task from inside
    /// their update without disturbing the scan.
    pub fn tick(&self, delta_time: f32) {
        let shared = &self.shared;
        if shared.ticking.get() {
            tracing::warn!("Nested task manager tick ignored");
            return;
        }
        shared.ticking.set(true);
        let _guard = TickGuard(&shared.ticking);

        let tick = {
            let mut metrics = shared.metrics.borrow_mut();
            metrics.record_tick();
            metrics.ticks
        };
        let mut index = shared.registry.borrow().len();
        let span = tick_span(tick, delta_time, index);
        let _enter = span.enter();

        let mut reaped = 0u64;
        while index > 0 {
            index -= 1;

            let task = {
                let mut registry = shared.registry.borrow_mut();
                let live = match registry.slot(index) {
                    Some(Some(task)) if !task.is_over() => Some(task.clone()),
                    Some(_) => None,
                    None => continue,
                };
                match live {
                    Some(task) => task,
                    None => {
                        registry.swap_remove(index);
                        reaped += 1;
                        continue;
                    }
                }
            };

            task.update(delta_time);
        }

        if reaped > 0 {
            shared.metrics.borrow_mut().record_reaped(reaped);
            span.record("reaped", reaped);
        }
    }

    // Control by id

    /// Stop the task with `id`; unknown ids are ignored
    pub fn stop_task(&self, id: TaskId) {
        if let Some(task) = self.get_task(id) {
            task.stop();
        }
    }

    /// Pause the task with `id`; unknown ids are ignored
    pub fn pause_task(&self, id: TaskId) {
        if let Some(task) = self.get_task(id) {
            task.pause();
        }
    }

    /// Resume the task with `id`; unknown ids are ignored
    pub fn resume_task(&self, id: TaskId) {
        if let Some(task) = self.get_task(id) {
            task.resume();
        }
    }

    /// Stop every live task
    pub fn stop_all(&self) {
        let tasks: Vec<Task> = self.shared.registry.borrow().all_tasks().cloned().collect();
        tracing::info!(tasks = tasks.len(), "Stopping all tasks");
        for task in tasks {
            if !task.is_over() {
                task.stop();
            }
        }
    }

    // Queries

    /// Live task with `id`, if any
    pub fn get_task(&self, id: TaskId) -> Option<Task> {
        self.shared.registry.borrow().get(id).cloned()
    }

    /// Number of tasks currently held
    pub fn active_task_count(&self) -> usize {
        self.shared.registry.borrow().live_count()
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.shared.registry.borrow().task_ids()
    }

    pub fn is_ticking(&self) -> bool {
        self.shared.ticking.get()
    }

    pub fn get_stats(&self) -> TaskManagerStats {
        let registry = self.shared.registry.borrow();
        let metrics = self.shared.metrics.borrow();

        let mut tasks_by_state = HashMap::new();
        for state in TaskState::ALL {
            tasks_by_state.insert(state, registry.tasks_by_state(state).len());
        }

        TaskManagerStats {
            active_tasks: registry.live_count(),
            tasks_by_state,
            ticks: metrics.ticks,
            tasks_started: metrics.tasks_started,
            tasks_finished: metrics.tasks_finished,
            tasks_stopped: metrics.tasks_stopped,
            tasks_reaped: metrics.tasks_reaped,
        }
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskManager")
            .field("active_tasks", &self.active_task_count())
            .field("ticking", &self.is_ticking())
            .field("config", &self.shared.config)
            .finish()
    }
}
