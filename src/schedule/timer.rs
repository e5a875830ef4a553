use serde::{Deserialize, Serialize};

/// Restartable countdown.
///
/// The timer is ready once its counter has run down to zero or below. It is
/// a plain value: whoever owns it decides when to feed it frame time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    default_time: f32,
    timer: f32,
}

impl Timer {
    /// A timer that recharges to `default_time` and starts out ready
    pub fn new(default_time: f32) -> Self {
        let mut timer = Self::default();
        timer.init(default_time, 0.0);
        timer
    }

    pub fn init(&mut self, default_time: f32, start_offset: f32) {
        self.default_time = default_time;
        self.timer = start_offset;
    }

    /// `to_start = true` makes the timer ready right away; `false` recharges it
    pub fn reset(&mut self, to_start: bool) {
        self.timer = if to_start { 0.0 } else { self.default_time };
    }

    /// Whether the countdown has run out. With `reset`, a ready timer is
    /// recharged to its full duration as part of the check.
    pub fn is_ready(&mut self, reset: bool) -> bool {
        let ready = self.timer <= 0.0;
        if ready && reset {
            self.timer = self.default_time;
        }
        ready
    }

    /// Count down by `dt`. Returns true while the counter is at or below zero;
    /// with `auto_reset` the timer recharges to full on that tick.
    pub fn update(&mut self, dt: f32, auto_reset: bool) -> bool {
        self.timer -= dt;
        if self.timer <= 0.0 {
            if auto_reset {
                self.reset(false);
            }
            return true;
        }
        false
    }

    pub fn remaining(&self) -> f32 {
        self.timer
    }

    pub fn default_time(&self) -> f32 {
        self.default_time
    }
}
