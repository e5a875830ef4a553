pub mod cli;
pub mod config;
pub mod context;
pub mod lifecycle;
pub mod scenario;
pub mod schedule;
pub mod task_manager;
