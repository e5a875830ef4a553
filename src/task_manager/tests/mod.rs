mod delay_tasks;
mod control_by_id;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::Task;

/// Shared event log for asserting callback order
type EventLog = Rc<RefCell<Vec<String>>>;

fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn push(log: &EventLog, event: impl Into<String>) {
    log.borrow_mut().push(event.into());
}

/// Count how many times the task's update subscribers ran
fn count_updates(task: &Task) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let sink = count.clone();
    task.on_update(move |_| sink.set(sink.get() + 1));
    count
}
