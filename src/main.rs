use clap::Parser;
use dotenv::dotenv;
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use frame_tasks::{
    cli::{Cli, Commands, RunArgs, ValidateArgs},
    config::{AppConfig, read_scenario},
    context::ContextBuilder,
    lifecycle::Lifecycle,
};

// Tasks are single-threaded Rc handles, so everything runs on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenv().ok();

    // Initialize tracing with environment filter using CLI log level
    let log_level = format!("frame_tasks={},info", cli.log_level);
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Validate(args) => validate(&args),
        Commands::Run(args) => run(args, &cli.log_level).await,
    }
}

fn validate(args: &ValidateArgs) -> eyre::Result<()> {
    let scenario = read_scenario(&args.scenario_file)?;
    tracing::info!(
        tasks = scenario.tasks.len(),
        triggers = scenario.triggers.len(),
        "Scenario {} is valid",
        args.scenario_file
    );
    for line in scenario.summary() {
        println!("{line}");
    }
    Ok(())
}

async fn run(args: RunArgs, log_level: &str) -> eyre::Result<()> {
    let app_config = AppConfig::from_run_args(&args, log_level)?;
    let scenario = app_config.load_scenario()?;

    if scenario.is_empty() {
        tracing::warn!("Scenario has no tasks or triggers; nothing to run");
        return Ok(());
    }

    let mut ctx = ContextBuilder::new()
        .with_config(app_config.scheduler_config.clone())
        .build();
    let handles = scenario.apply(&ctx);
    tracing::info!(
        tasks = handles.tasks.len(),
        triggers = handles.triggers.len(),
        fps = app_config.frame_config.fps,
        "Scenario loaded"
    );

    let frame_config = &app_config.frame_config;
    let nominal = frame_config.frame_interval();
    let mut interval = tokio::time::interval(nominal);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let delta_time = if frame_config.fixed_step {
                    nominal.as_secs_f32()
                } else {
                    now.duration_since(last_frame).as_secs_f32()
                };
                last_frame = now;

                ctx.on_update(delta_time);

                if ctx.is_idle() {
                    tracing::info!(frame = ctx.frame(), "All scenario work completed");
                    break;
                }
                if frame_config.frame_limit_reached(ctx.frame()) {
                    tracing::warn!(
                        frame = ctx.frame(),
                        active_tasks = ctx.task_manager().active_task_count(),
                        pending_triggers = ctx.trigger().pending_count(),
                        "Frame limit reached with work still pending"
                    );
                    break;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("SIGINT received; stopping scheduled work");
                break;
            }
        }
    }

    ctx.before_free();
    ctx.free();

    let stats = ctx.task_manager().get_stats();
    tracing::info!(
        frames = ctx.frame(),
        tasks_started = stats.tasks_started,
        tasks_finished = stats.tasks_finished,
        tasks_stopped = stats.tasks_stopped,
        "Frame loop shutdown complete"
    );
    Ok(())
}
