//! Per-variant task behaviour.
//!
//! A [`TaskBehavior`] advances whatever private countdown or condition a task
//! variant owns. It never transitions the task itself: it reports
//! [`Step::Finish`] and the owning task calls `finish()` once its own borrows
//! are released.

/// Outcome of a behaviour hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finish,
}

pub trait TaskBehavior {
    /// Short name used in log fields
    fn kind(&self) -> &'static str;

    /// Runs right after the start subscribers fired
    fn on_start(&mut self) -> Step {
        Step::Continue
    }

    /// Runs once per tick while the task is running, after the update subscribers
    fn on_update(&mut self, _delta_time: f32) -> Step {
        Step::Continue
    }
}

/// Task with no built-in completion; it ends through `finish()` or `stop()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Custom;

impl TaskBehavior for Custom {
    fn kind(&self) -> &'static str {
        "custom"
    }
}

/// Finishes once the configured number of seconds has elapsed
#[derive(Debug, Clone, Copy)]
pub struct DelaySeconds {
    remaining: f32,
}

impl DelaySeconds {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl TaskBehavior for DelaySeconds {
    fn kind(&self) -> &'static str {
        "delay_seconds"
    }

    fn on_start(&mut self) -> Step {
        if self.remaining <= 0.0 {
            Step::Finish
        } else {
            Step::Continue
        }
    }

    fn on_update(&mut self, delta_time: f32) -> Step {
        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            Step::Finish
        } else {
            Step::Continue
        }
    }
}

/// Finishes after the configured number of ticks
#[derive(Debug, Clone, Copy)]
pub struct DelayFrames {
    remaining: u32,
}

impl DelayFrames {
    pub fn new(frames: u32) -> Self {
        Self { remaining: frames }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl TaskBehavior for DelayFrames {
    fn kind(&self) -> &'static str {
        "delay_frames"
    }

    fn on_start(&mut self) -> Step {
        if self.remaining == 0 {
            Step::Finish
        } else {
            Step::Continue
        }
    }

    fn on_update(&mut self, _delta_time: f32) -> Step {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Step::Finish
        } else {
            Step::Continue
        }
    }
}
