use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::time::Duration;

use crate::cli::RunArgs;
use crate::scenario::ScenarioConfig;
use crate::task_manager::TaskManagerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub scenario_file: String,
    pub frame_config: FrameConfig,
    pub scheduler_config: SchedulerConfig,
}

/// Pace of the driving loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    pub fps: u32,
    /// 0 = run until all work is done
    pub max_frames: u64,
    pub fixed_step: bool,
}

/// Settings for a [`FrameContext`](crate::context::FrameContext)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub task_manager: TaskManagerConfig,
    pub trigger_capacity: usize,
    /// Upper bound for a single tick's delta time
    pub max_delta_seconds: Option<f32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            scenario_file: "scenario.yaml".to_string(),
            frame_config: FrameConfig::default(),
            scheduler_config: SchedulerConfig::default(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            max_frames: 0,
            fixed_step: false,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            task_manager: TaskManagerConfig::default(),
            trigger_capacity: 16,
            max_delta_seconds: None,
        }
    }
}

impl FrameConfig {
    /// Nominal time between frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    pub fn frame_limit_reached(&self, frame: u64) -> bool {
        self.max_frames > 0 && frame >= self.max_frames
    }
}

impl AppConfig {
    /// Create AppConfig from CLI arguments
    pub fn from_run_args(args: &RunArgs, cli_log_level: &str) -> eyre::Result<Self> {
        if args.fps == 0 {
            return Err(eyre::eyre!("--fps must be at least 1"));
        }
        if let Some(max_delta) = args.max_delta_seconds {
            if max_delta <= 0.0 {
                return Err(eyre::eyre!("--max-delta-seconds must be positive"));
            }
        }

        let mut config = Self::from(args);
        config.log_level = cli_log_level.to_string();
        Ok(config)
    }

    /// Load the scenario this configuration points at
    pub fn load_scenario(&self) -> eyre::Result<ScenarioConfig> {
        read_scenario(&self.scenario_file)
    }
}

impl From<&RunArgs> for AppConfig {
    fn from(args: &RunArgs) -> Self {
        Self {
            log_level: "info".to_string(), // Will be set from CLI
            scenario_file: args.scenario_file.clone(),
            frame_config: FrameConfig {
                fps: args.fps,
                max_frames: args.max_frames,
                fixed_step: args.fixed_step,
            },
            scheduler_config: SchedulerConfig {
                max_delta_seconds: args.max_delta_seconds,
                ..SchedulerConfig::default()
            },
        }
    }
}

/// Read scenario configuration from YAML file
pub fn read_scenario(filename: &str) -> eyre::Result<ScenarioConfig> {
    let file = File::open(filename)
        .wrap_err_with(|| format!("Failed to open scenario YAML file {filename}"))?;
    ScenarioConfig::from_yaml(file)
}
