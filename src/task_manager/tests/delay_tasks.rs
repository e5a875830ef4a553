use super::super::*;
use super::{event_log, push};

#[test]
fn test_zero_second_delay_finishes_inside_start() {
    let manager = TaskManager::new();
    let log = event_log();
    let task = manager.delay_seconds(0.0);
    let (start_log, finish_log) = (log.clone(), log.clone());
    task.on_start(move || push(&start_log, "start"))
        .on_finished(move |is_stopped| push(&finish_log, format!("finished:{is_stopped}")));

    task.start();
    assert!(task.is_finished());
    assert_eq!(task.kind(), "delay_seconds");
    assert_eq!(*log.borrow(), vec!["start", "finished:false"]);
    assert_eq!(manager.active_task_count(), 0);
}

#[test]
fn test_negative_second_delay_finishes_inside_start() {
    let manager = TaskManager::new();
    let task = manager.delay_seconds(-3.0);
    task.start();
    assert!(task.is_finished());
}

#[test]
fn test_second_delay_counts_down() {
    let manager = TaskManager::new();
    let task = manager.delay_seconds(1.0);
    task.start();

    for _ in 0..3 {
        manager.tick(0.25);
        assert!(task.is_running());
    }
    manager.tick(0.25);
    assert!(task.is_finished());
    assert_eq!(manager.active_task_count(), 0);
}

#[test]
fn test_three_frame_delay() {
    let manager = TaskManager::new();
    let task = manager.delay_frames(3);
    task.start();
    assert_eq!(task.kind(), "delay_frames");

    manager.tick(0.016);
    manager.tick(0.016);
    assert!(task.is_running());

    manager.tick(0.016);
    assert!(task.is_finished());
}

#[test]
fn test_single_frame_delay_finishes_on_next_tick() {
    let manager = TaskManager::new();
    let task = manager.delay_frames(1);
    task.start();
    assert!(task.is_running());

    task.update(0.0);
    assert!(task.is_finished());
}

#[test]
fn test_zero_frame_delay_finishes_inside_start() {
    let manager = TaskManager::new();
    let task = manager.delay_frames(0);
    task.start();
    assert!(task.is_finished());
    assert_eq!(manager.active_task_count(), 0);
}

#[test]
fn test_paused_delay_does_not_count_down() {
    let manager = TaskManager::new();
    let task = manager.delay_frames(2);
    task.start();

    manager.tick(0.016);
    task.pause();
    for _ in 0..5 {
        manager.tick(0.016);
    }
    assert!(task.is_paused());

    task.resume();
    manager.tick(0.016);
    assert!(task.is_finished());
}

#[test]
fn test_stop_from_update_subscriber_skips_countdown() {
    let manager = TaskManager::new();
    let log = event_log();
    let task = manager.delay_frames(1);
    let handle = task.clone();
    task.on_update(move |_| {
        handle.stop();
    });
    let finish_log = log.clone();
    task.on_finished(move |is_stopped| push(&finish_log, format!("finished:{is_stopped}")));

    task.start();
    manager.tick(0.016);

    // the countdown would have finished this tick, but the stop came first
    assert!(task.is_stopped());
    assert_eq!(*log.borrow(), vec!["finished:true"]);
}

struct FinishAfterTotal {
    total: f32,
    threshold: f32,
}

impl TaskBehavior for FinishAfterTotal {
    fn kind(&self) -> &'static str {
        "accumulate"
    }

    fn on_update(&mut self, delta_time: f32) -> Step {
        self.total += delta_time;
        if self.total >= self.threshold {
            Step::Finish
        } else {
            Step::Continue
        }
    }
}

#[test]
fn test_custom_behavior() {
    let manager = TaskManager::new();
    let task = manager.create_task_with(FinishAfterTotal {
        total: 0.0,
        threshold: 1.0,
    });
    task.start();
    assert_eq!(task.kind(), "accumulate");

    manager.tick(0.5);
    assert!(task.is_running());
    manager.tick(0.5);
    assert!(task.is_finished());
}
