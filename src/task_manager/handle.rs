use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::task_manager::behavior::{Step, TaskBehavior};
use crate::task_manager::error::TaskError;
use crate::task_manager::logging::TaskLoggingContext;
use crate::task_manager::manager::ManagerShared;
use crate::task_manager::types::{
    TaskCallback, TaskFinishCallback, TaskId, TaskState, TaskUpdateCallback,
};

#[derive(Default)]
struct Subscribers {
    on_start: Vec<TaskCallback>,
    on_pause: Vec<TaskCallback>,
    on_resume: Vec<TaskCallback>,
    on_stopped: Vec<TaskCallback>,
    on_update: Vec<TaskUpdateCallback>,
    on_finished: Vec<TaskFinishCallback>,
}

struct TaskInner {
    id: TaskId,
    kind: &'static str,
    state: Cell<TaskState>,
    manager: Weak<ManagerShared>,
    subscribers: RefCell<Subscribers>,
    behavior: RefCell<Box<dyn TaskBehavior>>,
}

/// Shared handle to a cooperative task.
///
/// Cloning is cheap and every clone refers to the same task. The caller keeps
/// one clone for chaining while the owning [`TaskManager`] holds another for as
/// long as the task is live.
///
/// Transitions are fluent: illegal ones are logged and leave the task
/// untouched, so calls like `task.start().on_finished(cb)` never fail. Use the
/// `try_*` methods to observe the rejection instead.
///
/// [`TaskManager`]: crate::task_manager::TaskManager
#[derive(Clone)]
pub struct Task {
    inner: Rc<TaskInner>,
}

impl Task {
    pub(crate) fn new(
        id: TaskId,
        manager: Weak<ManagerShared>,
        behavior: Box<dyn TaskBehavior>,
    ) -> Self {
        let kind = behavior.kind();
        tracing::trace!(task_id = %id, task_kind = kind, "Task created");

        Self {
            inner: Rc::new(TaskInner {
                id,
                kind,
                state: Cell::new(TaskState::Init),
                manager,
                subscribers: RefCell::new(Subscribers::default()),
                behavior: RefCell::new(behavior),
            }),
        }
    }

    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    pub fn kind(&self) -> &'static str {
        self.inner.kind
    }

    pub fn state(&self) -> TaskState {
        self.inner.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == TaskState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == TaskState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == TaskState::Stopped
    }

    pub fn is_finished(&self) -> bool {
        self.state() == TaskState::Finished
    }

    /// Stopped or finished
    pub fn is_over(&self) -> bool {
        self.state().is_over()
    }

    /// True when both handles point at the same task
    pub fn ptr_eq(&self, other: &Task) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // Transitions

    pub fn start(&self) -> &Self {
        self.try_start().unwrap_or_else(|err| {
            tracing::error!(task_id = %self.id(), error = %err, "Task cannot be started twice");
            self
        })
    }

    pub fn pause(&self) -> &Self {
        self.try_pause().unwrap_or_else(|err| self.log_rejected(err))
    }

    pub fn resume(&self) -> &Self {
        self.try_resume().unwrap_or_else(|err| self.log_rejected(err))
    }

    pub fn stop(&self) -> &Self {
        self.try_stop().unwrap_or_else(|err| self.log_rejected(err))
    }

    pub fn finish(&self) -> &Self {
        self.try_finish().unwrap_or_else(|err| self.log_rejected(err))
    }

    /// Init -> Running. Registers the task with its manager and fires the
    /// start subscribers before the behaviour gets its start hook.
    pub fn try_start(&self) -> Result<&Self, TaskError> {
        let state = self.state();
        if state != TaskState::Init {
            return Err(TaskError::AlreadyStarted {
                id: self.id(),
                state,
            });
        }

        let span = self.logging_context("start").create_span();
        let _enter = span.enter();

        match self.inner.manager.upgrade() {
            Some(manager) => manager.register_task(self),
            None => tracing::warn!(
                task_id = %self.id(),
                "Task manager is gone; started task will not be ticked"
            ),
        }

        self.set_state(TaskState::Running);
        Self::fire(&self.snapshot(|s| &s.on_start));

        if !self.is_over() && self.run_behavior(|behavior| behavior.on_start()) == Step::Finish {
            self.finish();
        }
        Ok(self)
    }

    /// Running -> Paused
    pub fn try_pause(&self) -> Result<&Self, TaskError> {
        self.check_transition(TaskState::Paused)?;
        self.set_state(TaskState::Paused);
        Self::fire(&self.snapshot(|s| &s.on_pause));
        Ok(self)
    }

    /// Paused -> Running. A task that was never started is rejected.
    pub fn try_resume(&self) -> Result<&Self, TaskError> {
        self.check_transition(TaskState::Running)?;
        self.set_state(TaskState::Running);
        Self::fire(&self.snapshot(|s| &s.on_resume));
        Ok(self)
    }

    /// Running|Paused -> Stopped. Stopped subscribers fire first; when the
    /// task was running the finished subscribers follow with `is_stopped = true`.
    pub fn try_stop(&self) -> Result<&Self, TaskError> {
        let last_state = self.check_transition(TaskState::Stopped)?;

        let span = self.logging_context("stop").create_span();
        let _enter = span.enter();

        self.set_state(TaskState::Stopped);
        Self::fire(&self.snapshot(|s| &s.on_stopped));
        if last_state == TaskState::Running {
            let finished = self.snapshot(|s| &s.on_finished);
            for cb in &finished {
                cb(true);
            }
        }
        // only a later finish() can fire from here on
        {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            let on_finished = std::mem::take(&mut subscribers.on_finished);
            *subscribers = Subscribers {
                on_finished,
                ..Subscribers::default()
            };
        }

        self.unregister();
        span.record("result", "stopped");
        Ok(self)
    }

    /// Any non-finished state -> Finished; fires the finished subscribers
    /// with `is_stopped = false`.
    pub fn try_finish(&self) -> Result<&Self, TaskError> {
        self.check_transition(TaskState::Finished)?;

        let span = self.logging_context("finish").create_span();
        let _enter = span.enter();

        self.set_state(TaskState::Finished);
        let finished = self.snapshot(|s| &s.on_finished);
        for cb in &finished {
            cb(false);
        }
        // terminal: drop subscribers so closures holding this handle are released
        *self.inner.subscribers.borrow_mut() = Subscribers::default();

        self.unregister();
        span.record("result", "finished");
        Ok(self)
    }

    /// Advance the task by one tick. Paused and terminal tasks ignore it.
    ///
    /// The manager only ticks started tasks, but a direct call on an
    /// unstarted task still runs its subscribers and behaviour.
    pub fn update(&self, delta_time: f32) {
        if self.is_over() || self.is_paused() {
            return;
        }

        let update = self.snapshot(|s| &s.on_update);
        for cb in &update {
            cb(delta_time);
        }

        if self.is_over() {
            return;
        }
        if self.run_behavior(|behavior| behavior.on_update(delta_time)) == Step::Finish {
            self.finish();
        }
    }

    // Subscribers

    pub fn on_start(&self, cb: impl Fn() + 'static) -> &Self {
        self.inner.subscribers.borrow_mut().on_start.push(Rc::new(cb));
        self
    }

    pub fn on_update(&self, cb: impl Fn(f32) + 'static) -> &Self {
        self.inner.subscribers.borrow_mut().on_update.push(Rc::new(cb));
        self
    }

    pub fn on_pause(&self, cb: impl Fn() + 'static) -> &Self {
        self.inner.subscribers.borrow_mut().on_pause.push(Rc::new(cb));
        self
    }

    pub fn on_resume(&self, cb: impl Fn() + 'static) -> &Self {
        self.inner.subscribers.borrow_mut().on_resume.push(Rc::new(cb));
        self
    }

    pub fn on_stopped(&self, cb: impl Fn() + 'static) -> &Self {
        self.inner.subscribers.borrow_mut().on_stopped.push(Rc::new(cb));
        self
    }

    /// The callback receives `true` when the task ended through `stop()`
    pub fn on_finished(&self, cb: impl Fn(bool) + 'static) -> &Self {
        self.inner.subscribers.borrow_mut().on_finished.push(Rc::new(cb));
        self
    }

    // Private

    /// Returns the current state when moving to `to` is allowed
    fn check_transition(&self, to: TaskState) -> Result<TaskState, TaskError> {
        let from = self.state();
        let allowed = match to {
            TaskState::Running => from == TaskState::Paused,
            TaskState::Paused => from == TaskState::Running,
            TaskState::Stopped => matches!(from, TaskState::Running | TaskState::Paused),
            TaskState::Finished => from != TaskState::Finished,
            TaskState::Init => false,
        };

        if allowed {
            Ok(from)
        } else {
            Err(TaskError::IllegalTransition {
                id: self.id(),
                from,
                to,
            })
        }
    }

    fn set_state(&self, new_state: TaskState) {
        let old_state = self.inner.state.replace(new_state);
        tracing::debug!(
            task_id = %self.id(),
            task_kind = self.kind(),
            old_state = %old_state,
            new_state = %new_state,
            "Task state transition"
        );
    }

    fn log_rejected(&self, err: TaskError) -> &Self {
        tracing::warn!(
            task_id = %self.id(),
            task_kind = self.kind(),
            error = %err,
            "Invalid task state transition attempted"
        );
        self
    }

    fn unregister(&self) {
        if let Some(manager) = self.inner.manager.upgrade() {
            manager.unregister_task(self);
        }
    }

    fn run_behavior(&self, hook: impl FnOnce(&mut dyn TaskBehavior) -> Step) -> Step {
        match self.inner.behavior.try_borrow_mut() {
            Ok(mut behavior) => hook(&mut **behavior),
            Err(_) => {
                tracing::warn!(task_id = %self.id(), "Re-entrant behaviour hook skipped");
                Step::Continue
            }
        }
    }

    /// Copy a subscriber list so callbacks can run without holding the borrow
    fn snapshot<C: Clone>(&self, slot: impl FnOnce(&Subscribers) -> &Vec<C>) -> Vec<C> {
        slot(&self.inner.subscribers.borrow()).clone()
    }

    fn fire(callbacks: &[TaskCallback]) {
        for cb in callbacks {
            cb();
        }
    }

    fn logging_context(&self, operation: &'static str) -> TaskLoggingContext {
        TaskLoggingContext::new(self.id(), self.kind(), operation)
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("state", &self.state())
            .finish()
    }
}
