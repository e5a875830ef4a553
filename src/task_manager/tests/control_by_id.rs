use super::super::*;
use super::{count_updates, event_log, push};

#[test]
fn test_pause_and_resume_by_id() {
    let manager = TaskManager::new();
    let task = manager.create_task();
    let updates = count_updates(&task);
    task.start();

    manager.pause_task(task.id());
    assert!(task.is_paused());
    manager.tick(0.016);
    assert_eq!(updates.get(), 0);

    manager.resume_task(task.id());
    assert!(task.is_running());
    manager.tick(0.016);
    assert_eq!(updates.get(), 1);
}

#[test]
fn test_stop_by_id() {
    let manager = TaskManager::new();
    let log = event_log();
    let task = manager.create_task();
    let other = manager.create_task();
    let stop_log = log.clone();
    task.on_stopped(move || push(&stop_log, "stopped"));
    task.start();
    other.start();

    manager.stop_task(task.id());
    assert!(task.is_stopped());
    assert!(other.is_running());
    assert_eq!(manager.active_task_count(), 1);
    assert_eq!(*log.borrow(), vec!["stopped"]);
}

#[test]
fn test_unknown_id_is_ignored() {
    let manager = TaskManager::new();
    let task = manager.create_task();
    task.start();

    let unknown = TaskId::from(u32::MAX);
    manager.stop_task(unknown);
    manager.pause_task(unknown);
    manager.resume_task(unknown);

    assert!(task.is_running());
    assert_eq!(manager.active_task_count(), 1);
}

#[test]
fn test_control_after_natural_completion_is_ignored() {
    let manager = TaskManager::new();
    let log = event_log();
    let task = manager.delay_frames(1);
    let finish_log = log.clone();
    task.on_finished(move |is_stopped| push(&finish_log, format!("finished:{is_stopped}")));
    task.start();

    manager.tick(0.016);
    assert!(task.is_finished());

    manager.stop_task(task.id());
    manager.pause_task(task.id());
    assert!(task.is_finished());
    assert_eq!(*log.borrow(), vec!["finished:false"]);
}

#[test]
fn test_unstarted_tasks_are_not_reachable_by_id() {
    let manager = TaskManager::new();
    let task = manager.create_task();

    manager.stop_task(task.id());
    assert_eq!(task.state(), TaskState::Init);
    assert!(manager.get_task(task.id()).is_none());
}

#[test]
fn test_stop_all() {
    let manager = TaskManager::new();
    let log = event_log();
    let tasks: Vec<Task> = (0..3).map(|_| manager.create_task()).collect();
    for (i, task) in tasks.iter().enumerate() {
        let stop_log = log.clone();
        task.on_stopped(move || push(&stop_log, format!("stopped:{i}")));
        task.start();
    }
    tasks[1].pause();

    manager.stop_all();
    assert!(tasks.iter().all(Task::is_stopped));
    assert_eq!(manager.active_task_count(), 0);
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn test_stats_by_state() {
    let manager = TaskManager::new();
    let running = manager.create_task();
    let paused = manager.create_task();
    let finished = manager.delay_frames(0);

    running.start();
    paused.start().pause();
    finished.start();

    let stats = manager.get_stats();
    assert_eq!(stats.active_tasks, 2);
    assert_eq!(stats.tasks_by_state[&TaskState::Running], 1);
    assert_eq!(stats.tasks_by_state[&TaskState::Paused], 1);
    assert_eq!(stats.tasks_by_state[&TaskState::Finished], 0);
    assert_eq!(stats.tasks_by_state.len(), TaskState::ALL.len());
    assert_eq!(stats.tasks_started, 3);
    assert_eq!(stats.tasks_finished, 1);

    manager.stop_all();
    let stats = manager.get_stats();
    assert_eq!(stats.tasks_stopped, 2);
    assert_eq!(stats.active_tasks, 0);
}
