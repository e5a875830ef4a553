/// Lifetime counters for a task manager
#[derive(Debug, Clone, Default)]
pub struct TaskMetrics {
    pub ticks: u64,
    pub tasks_started: u64,
    pub tasks_finished: u64,
    pub tasks_stopped: u64,
    /// Slots cleaned up by the tick scan (terminal tasks and cleared slots)
    pub tasks_reaped: u64,
}

impl TaskMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn record_start(&mut self) {
        self.tasks_started += 1;
    }

    pub fn record_finish(&mut self) {
        self.tasks_finished += 1;
    }

    pub fn record_stop(&mut self) {
        self.tasks_stopped += 1;
    }

    pub fn record_reaped(&mut self, count: u64) {
        self.tasks_reaped += count;
    }
}
