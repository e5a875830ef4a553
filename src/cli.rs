use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "frame-tasks")]
#[command(about = "Run delay tasks and triggers on a fixed-rate frame loop")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a scenario until every task and trigger has completed
    Run(RunArgs),

    /// Parse a scenario file and print what it would schedule
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Path to scenario file
    #[arg(short, long, default_value = "scenario.yaml", env = "FRAME_TASKS_SCENARIO")]
    pub scenario_file: String,

    /// Frames per second of the driving loop
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Stop after this many frames even if work is pending (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub max_frames: u64,

    /// Clamp a single frame's delta time to this many seconds
    #[arg(long)]
    pub max_delta_seconds: Option<f32>,

    /// Feed the nominal 1/fps delta instead of measured wall-clock time
    #[arg(long)]
    pub fixed_step: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Path to scenario file
    #[arg(short, long, default_value = "scenario.yaml", env = "FRAME_TASKS_SCENARIO")]
    pub scenario_file: String,
}
