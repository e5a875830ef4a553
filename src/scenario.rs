use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::context::FrameContext;
use crate::schedule::TriggerId;
use crate::task_manager::TaskId;

/// How long an entry waits before completing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delay {
    Seconds(f32),
    Frames(u32),
}

impl std::fmt::Display for Delay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delay::Seconds(seconds) => write!(f, "{seconds}s"),
            Delay::Frames(frames) => write!(f, "{frames} frames"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    pub name: String,
    pub delay: Delay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerEntry {
    pub param: String,
    pub delay: Delay,
}

/// Work loaded into a frame context by the demo driver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
    #[serde(default)]
    pub triggers: Vec<TriggerEntry>,
}

/// Ids handed out while applying a scenario
#[derive(Debug, Clone, Default)]
pub struct ScenarioHandles {
    pub tasks: Vec<(String, TaskId)>,
    pub triggers: Vec<(String, TriggerId)>,
}

impl ScenarioConfig {
    pub fn from_yaml<R: std::io::Read>(reader: R) -> eyre::Result<Self> {
        let scenario: Self = serde_yaml::from_reader(reader).wrap_err("Failed to parse YAML")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml<W: std::io::Write>(&self, writer: W) -> eyre::Result<()> {
        serde_yaml::to_writer(writer, self).wrap_err("Failed to write YAML")
    }

    /// Task names must be non-empty and unique
    pub fn validate(&self) -> eyre::Result<()> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if task.name.trim().is_empty() {
                return Err(eyre::eyre!("Scenario task with empty name"));
            }
            if !seen.insert(task.name.as_str()) {
                return Err(eyre::eyre!("Task with name '{}' already exists", task.name));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.triggers.is_empty()
    }

    /// Start every task and queue every trigger on `ctx`
    pub fn apply(&self, ctx: &FrameContext) -> ScenarioHandles {
        let mut handles = ScenarioHandles::default();

        for entry in &self.tasks {
            let manager = ctx.task_manager();
            let task = match entry.delay {
                Delay::Seconds(seconds) => manager.delay_seconds(seconds),
                Delay::Frames(frames) => manager.delay_frames(frames),
            };

            let name = entry.name.clone();
            let task_id = task.id();
            tracing::info!(task_id = %task_id, task_name = %name, delay = %entry.delay, "Starting scenario task");
            task.on_finished(move |is_stopped| {
                if is_stopped {
                    tracing::info!(task_id = %task_id, task_name = %name, "Scenario task stopped");
                } else {
                    tracing::info!(task_id = %task_id, task_name = %name, "Scenario task finished");
                }
            })
            .start();

            handles.tasks.push((entry.name.clone(), task_id));
        }

        for entry in &self.triggers {
            let trigger = ctx.trigger();
            let fire = |param: &str| tracing::info!(param = param, "Scenario trigger fired");
            let id = match entry.delay {
                Delay::Seconds(seconds) => trigger.delay_seconds(seconds, fire, entry.param.clone()),
                Delay::Frames(frames) => trigger.delay_frame(
                    i32::try_from(frames).unwrap_or(i32::MAX),
                    fire,
                    entry.param.clone(),
                ),
            };
            handles.triggers.push((entry.param.clone(), id));
        }

        handles
    }

    /// One line per entry, for the validate command
    pub fn summary(&self) -> Vec<String> {
        let tasks = self
            .tasks
            .iter()
            .map(|task| format!("task {} after {}", task.name, task.delay));
        let triggers = self
            .triggers
            .iter()
            .map(|trigger| format!("trigger {} after {}", trigger.param, trigger.delay));
        tasks.chain(triggers).collect()
    }
}
