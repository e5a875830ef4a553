use crate::config::SchedulerConfig;
use crate::lifecycle::Lifecycle;
use crate::schedule::Trigger;
use crate::task_manager::{TaskManager, TaskManagerConfig};

/// Scheduling context owned by the host loop.
///
/// Holds one task manager and one trigger queue and advances both from a
/// single `tick`. Anything that schedules work is handed this context (or a
/// clone of its task manager) instead of reaching for global state.
#[derive(Debug)]
pub struct FrameContext {
    config: SchedulerConfig,
    task_manager: TaskManager,
    trigger: Trigger,
    frame: u64,
    initialized: bool,
}

impl FrameContext {
    pub fn new(config: SchedulerConfig) -> Self {
        let task_manager = TaskManager::with_config(config.task_manager.clone());
        let trigger = Trigger::with_capacity(config.trigger_capacity);
        Self {
            config,
            task_manager,
            trigger,
            frame: 0,
            initialized: false,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn task_manager(&self) -> &TaskManager {
        &self.task_manager
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// No live tasks and no queued triggers
    pub fn is_idle(&self) -> bool {
        self.task_manager.active_task_count() == 0 && self.trigger.pending_count() == 0
    }

    /// Advance triggers, then tasks, by one frame
    pub fn tick(&mut self, delta_time: f32) {
        let delta_time = match self.config.max_delta_seconds {
            Some(max_delta) if delta_time > max_delta => {
                tracing::debug!(delta_time, max_delta, "Clamping frame delta");
                max_delta
            }
            _ => delta_time,
        };

        self.frame += 1;
        self.trigger.tick(delta_time);
        self.task_manager.tick(delta_time);
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Lifecycle for FrameContext {
    fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        tracing::info!(
            initial_capacity = self.config.task_manager.initial_capacity,
            trigger_capacity = self.config.trigger_capacity,
            "Frame context initialized"
        );
    }

    fn on_update(&mut self, dt: f32) {
        self.tick(dt);
    }

    fn free(&mut self) {
        tracing::info!(
            active_tasks = self.task_manager.active_task_count(),
            pending_triggers = self.trigger.pending_count(),
            "Releasing frame context"
        );
        self.task_manager.stop_all();
        self.trigger.cancel_all();
        self.initialized = false;
    }
}

/// Builder pattern for fluent FrameContext configuration
#[derive(Debug, Default)]
pub struct ContextBuilder {
    config: Option<SchedulerConfig>,
    task_manager_config: Option<TaskManagerConfig>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scheduler configuration
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the task manager part of the configuration
    pub fn with_task_manager_config(mut self, task_config: TaskManagerConfig) -> Self {
        self.task_manager_config = Some(task_config);
        self
    }

    /// Build and initialize the context
    pub fn build(self) -> FrameContext {
        let mut config = self.config.unwrap_or_default();
        if let Some(task_config) = self.task_manager_config {
            config.task_manager = task_config;
        }

        let mut ctx = FrameContext::new(config);
        ctx.init();
        ctx.after_init();
        ctx
    }
}
