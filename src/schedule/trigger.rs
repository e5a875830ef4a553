use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::task_manager::manager::TickGuard;

/// Handle returned by [`Trigger`] scheduling calls
pub type TriggerId = u32;

/// Shared by every trigger so an id never names records in two queues
static TRIGGER_ID_COUNTER: AtomicU32 = AtomicU32::new(0);

type TriggerCallback = Box<dyn FnOnce(&str)>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Countdown {
    Seconds(f32),
    Frames(i32),
    /// Cancelled: fires nothing and is dropped on the next tick
    Inert,
}

struct DelayRecord {
    id: TriggerId,
    countdown: Countdown,
    param: String,
    callback: Option<TriggerCallback>,
}

impl DelayRecord {
    /// Returns the callback so it can be dropped outside the queue borrow
    fn cancel(&mut self) -> Option<TriggerCallback> {
        self.countdown = Countdown::Inert;
        self.callback.take()
    }

    /// Advance by one tick; true once the record is due
    fn advance(&mut self, delta: f32) -> bool {
        match &mut self.countdown {
            Countdown::Seconds(seconds) if *seconds > 0.0 => {
                *seconds -= delta;
                *seconds <= 0.0
            }
            Countdown::Frames(frames) if *frames > 0 => {
                *frames -= 1;
                *frames <= 0
            }
            _ => true,
        }
    }
}

struct TriggerShared {
    pending: RefCell<Vec<DelayRecord>>,
    ticking: Cell<bool>,
}

/// Batch of delayed callbacks driven by the owner's frame loop.
///
/// Each record counts down either seconds or frames and fires its callback
/// with the payload string exactly once. Cloning yields another handle to the
/// same queue, so a callback may capture one and schedule or cancel records
/// while the queue is ticking. Records scheduled during a tick wait for the
/// next one.
#[derive(Clone)]
pub struct Trigger {
    shared: Rc<TriggerShared>,
}

impl Trigger {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Rc::new(TriggerShared {
                pending: RefCell::new(Vec::with_capacity(capacity)),
                ticking: Cell::new(false),
            }),
        }
    }

    /// Fire `cb(param)` once `seconds` of tick time have passed
    pub fn delay_seconds(
        &self,
        seconds: f32,
        cb: impl FnOnce(&str) + 'static,
        param: impl Into<String>,
    ) -> TriggerId {
        self.schedule(Countdown::Seconds(seconds), Box::new(cb), param.into())
    }

    /// Fire `cb(param)` after `frames` ticks
    pub fn delay_frame(
        &self,
        frames: i32,
        cb: impl FnOnce(&str) + 'static,
        param: impl Into<String>,
    ) -> TriggerId {
        self.schedule(Countdown::Frames(frames), Box::new(cb), param.into())
    }

    /// Make the record inert. It stays queued until the next tick removes it.
    pub fn cancel(&self, id: TriggerId) {
        let dropped = {
            let mut pending = self.shared.pending.borrow_mut();
            pending
                .iter_mut()
                .find(|record| record.id == id)
                .map(DelayRecord::cancel)
        };

        match dropped {
            Some(_) => tracing::debug!(trigger_id = id, "Delayed callback cancelled"),
            None => tracing::trace!(trigger_id = id, "Cancel for unknown trigger ignored"),
        }
    }

    pub fn cancel_all(&self) {
        let dropped: Vec<Option<TriggerCallback>> = {
            let mut pending = self.shared.pending.borrow_mut();
            pending.iter_mut().map(DelayRecord::cancel).collect()
        };
        tracing::debug!(pending = dropped.len(), "All delayed callbacks cancelled");
    }

    /// Advance every record and fire the ones that came due, newest first.
    ///
    /// The scan covers the records queued when the tick began. Due records
    /// are removed before their callback runs, so callbacks may cancel
    /// records the scan has not reached yet or queue new ones. A nested tick
    /// from inside a callback is ignored.
    pub fn tick(&self, delta: f32) {
        let shared = &self.shared;
        if shared.ticking.get() {
            tracing::warn!("Nested trigger tick ignored");
            return;
        }

        let mut index = shared.pending.borrow().len();
        if index == 0 {
            return;
        }
        shared.ticking.set(true);
        let _guard = TickGuard(&shared.ticking);

        while index > 0 {
            index -= 1;

            // only this loop removes records, so indices below `index` stay put
            let record = {
                let mut pending = shared.pending.borrow_mut();
                let due = pending
                    .get_mut(index)
                    .is_some_and(|record| record.advance(delta));
                if !due {
                    continue;
                }
                pending.remove(index)
            };

            if let Some(cb) = record.callback {
                tracing::trace!(trigger_id = record.id, param = %record.param, "Delayed callback fired");
                cb(&record.param);
            }
        }
    }

    /// Records still queued, cancelled ones included
    pub fn pending_count(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    pub fn is_pending(&self, id: TriggerId) -> bool {
        self.shared
            .pending
            .borrow()
            .iter()
            .any(|record| record.id == id && record.countdown != Countdown::Inert)
    }

    fn schedule(&self, countdown: Countdown, cb: TriggerCallback, param: String) -> TriggerId {
        let id = TRIGGER_ID_COUNTER.fetch_add(1, Ordering::SeqCst);

        self.shared.pending.borrow_mut().push(DelayRecord {
            id,
            countdown,
            param,
            callback: Some(cb),
        });
        id
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("pending", &self.pending_count())
            .field("ticking", &self.shared.ticking.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn() -> Box<dyn FnOnce(&str)>) {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = fired.clone();
        let make = move || {
            let sink = sink.clone();
            Box::new(move |param: &str| sink.borrow_mut().push(param.to_string()))
                as Box<dyn FnOnce(&str)>
        };
        (fired, make)
    }

    #[test]
    fn test_ids_are_unique_across_triggers() {
        let trigger = Trigger::new();
        let a = trigger.delay_seconds(1.0, |_| {}, "a");
        let b = trigger.delay_frame(1, |_| {}, "b");
        assert!(b > a);

        let other = Trigger::new();
        let c = other.delay_frame(1, |_| {}, "");
        assert!(c > b);

        // an id from one queue never touches another queue's records
        other.cancel(a);
        assert!(other.is_pending(c));
        assert!(trigger.is_pending(a));
    }

    #[test]
    fn test_delay_seconds_fires_with_param() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        trigger.delay_seconds(1.0, make(), "spawn_wave");

        trigger.tick(0.5);
        assert!(fired.borrow().is_empty());
        assert_eq!(trigger.pending_count(), 1);

        trigger.tick(0.5);
        assert_eq!(*fired.borrow(), vec!["spawn_wave".to_string()]);
        assert_eq!(trigger.pending_count(), 0);
    }

    #[test]
    fn test_delay_frame_counts_ticks() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        trigger.delay_frame(3, make(), "flash");

        trigger.tick(10.0);
        trigger.tick(10.0);
        assert!(fired.borrow().is_empty());
        trigger.tick(10.0);
        assert_eq!(fired.borrow().len(), 1);
    }

    #[test]
    fn test_zero_delay_fires_on_next_tick() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        trigger.delay_seconds(0.0, make(), "now");
        trigger.delay_frame(0, make(), "now_too");
        assert!(fired.borrow().is_empty());

        trigger.tick(0.0);
        assert_eq!(fired.borrow().len(), 2);
        assert_eq!(trigger.pending_count(), 0);
    }

    #[test]
    fn test_cancel_is_silent_and_removed_next_tick() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        let cancelled = trigger.delay_seconds(1.0, make(), "cancelled");
        trigger.delay_seconds(1.0, make(), "kept");

        trigger.cancel(cancelled);
        assert!(!trigger.is_pending(cancelled));
        assert_eq!(trigger.pending_count(), 2);

        trigger.tick(0.1);
        assert_eq!(trigger.pending_count(), 1);
        assert!(fired.borrow().is_empty());

        trigger.tick(1.0);
        assert_eq!(*fired.borrow(), vec!["kept".to_string()]);
    }

    #[test]
    fn test_cancel_unknown_id_is_ignored() {
        let trigger = Trigger::new();
        trigger.delay_frame(2, |_| {}, "");
        trigger.cancel(u32::MAX);
        assert_eq!(trigger.pending_count(), 1);
    }

    #[test]
    fn test_cancel_all() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        trigger.delay_seconds(0.1, make(), "a");
        trigger.delay_frame(1, make(), "b");

        trigger.cancel_all();
        trigger.tick(1.0);
        assert!(fired.borrow().is_empty());
        assert_eq!(trigger.pending_count(), 0);
    }

    #[test]
    fn test_due_records_fire_newest_first() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        trigger.delay_frame(1, make(), "first");
        trigger.delay_frame(1, make(), "second");

        trigger.tick(0.0);
        assert_eq!(
            *fired.borrow(),
            vec!["second".to_string(), "first".to_string()]
        );
    }

    #[test]
    fn test_callback_cancels_record_not_yet_reached() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        // scanned last because the scan runs newest first
        let victim = trigger.delay_frame(1, make(), "victim");

        let handle = trigger.clone();
        let sink = make();
        trigger.delay_frame(
            1,
            move |param| {
                handle.cancel(victim);
                sink(param);
            },
            "canceller",
        );

        trigger.tick(0.0);
        assert_eq!(*fired.borrow(), vec!["canceller".to_string()]);
        assert_eq!(trigger.pending_count(), 0);

        trigger.tick(0.0);
        assert_eq!(fired.borrow().len(), 1);
    }

    #[test]
    fn test_callback_cancel_all_stops_unreached_records() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        trigger.delay_frame(1, make(), "older");
        trigger.delay_frame(5, make(), "later");

        let handle = trigger.clone();
        let sink = make();
        trigger.delay_frame(
            1,
            move |param| {
                sink(param);
                handle.cancel_all();
            },
            "stop_everything",
        );

        for _ in 0..6 {
            trigger.tick(0.0);
        }
        assert_eq!(*fired.borrow(), vec!["stop_everything".to_string()]);
        assert_eq!(trigger.pending_count(), 0);
    }

    #[test]
    fn test_callback_schedules_follow_up_for_next_tick() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();

        let handle = trigger.clone();
        let follow_up = make();
        let sink = make();
        trigger.delay_frame(
            1,
            move |param| {
                sink(param);
                handle.delay_frame(0, follow_up, "follow_up");
            },
            "first",
        );

        trigger.tick(0.0);
        assert_eq!(*fired.borrow(), vec!["first".to_string()]);
        assert_eq!(trigger.pending_count(), 1);

        trigger.tick(0.0);
        assert_eq!(
            *fired.borrow(),
            vec!["first".to_string(), "follow_up".to_string()]
        );
        assert_eq!(trigger.pending_count(), 0);
    }

    #[test]
    fn test_nested_tick_is_ignored() {
        let (fired, make) = recorder();
        let trigger = Trigger::new();
        trigger.delay_frame(2, make(), "slow");

        let handle = trigger.clone();
        trigger.delay_frame(1, move |_| handle.tick(0.0), "nested");

        trigger.tick(0.0);
        assert!(fired.borrow().is_empty());
        assert_eq!(trigger.pending_count(), 1);

        trigger.tick(0.0);
        assert_eq!(*fired.borrow(), vec!["slow".to_string()]);
    }
}
