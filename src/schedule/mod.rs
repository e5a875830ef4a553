//! Frame-time primitives that live outside the task manager: a restartable
//! countdown and a fire-and-forget delayed callback queue.

pub mod timer;
pub mod trigger;

pub use timer::Timer;
pub use trigger::{Trigger, TriggerId};
