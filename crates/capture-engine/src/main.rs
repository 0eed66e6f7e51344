//! Sandbox engine binary for the capture arena.
//!
//! Runs the decision-and-reward core against a seeded kinematic arena so
//! the controllers, reward table and episode runner can be exercised without
//! a game engine attached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `capture-config.yaml` (or defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Build the sandbox arena and one controller per agent
//! 4. Run the configured number of episodes
//! 5. Log every episode summary as JSON

mod error;
mod progress;
mod sandbox;

use std::path::Path;

use capture_core::config::{ActionSourceKind, CaptureConfig, LoggingConfig};
use capture_core::controller::AgentController;
use capture_core::decision::{ActionSource, RandomActionSource, StubActionSource};
use capture_core::runner::{self, Arena, EpisodeAgent};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;
use crate::sandbox::SandboxArena;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "capture-config.yaml";

/// Application entry point for the sandbox engine.
///
/// # Errors
///
/// Returns an error if configuration, arena construction or an episode
/// fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_logging(&config.logging);

    info!(
        episodes = config.episode.episodes,
        duration_seconds = config.episode.duration_seconds,
        step_seconds = config.episode.step_seconds,
        seed = config.episode.seed,
        action_source = ?config.episode.action_source,
        "capture-engine starting"
    );

    run(&config)?;

    info!("capture-engine shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the configuration from `capture-config.yaml`.
///
/// Looks for the config file relative to the current working directory and
/// falls back to defaults when it is absent.
fn load_config() -> Result<CaptureConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(CaptureConfig::from_file(config_path)?)
    } else {
        Ok(CaptureConfig::default())
    }
}

fn action_source(kind: ActionSourceKind, seed: u64) -> Box<dyn ActionSource> {
    match kind {
        ActionSourceKind::Stub => Box::new(StubActionSource::new()),
        ActionSourceKind::Random => Box::new(RandomActionSource::new(seed)),
    }
}

fn run(config: &CaptureConfig) -> Result<(), EngineError> {
    let seed = config.episode.seed;
    let mut arena = SandboxArena::new(&config.arena, seed)?;
    let mut clock = config.episode.clock()?;
    let policy = config.policy_config();
    let table = config.reward_table()?;

    let mut agents: Vec<EpisodeAgent> = arena
        .roster()
        .into_iter()
        .zip(0_u64..)
        .map(|((agent, team), index)| EpisodeAgent {
            controller: AgentController::new(agent, team, policy.clone(), table.clone()),
            source: action_source(config.episode.action_source, seed.wrapping_add(index)),
        })
        .collect();
    info!(agents = agents.len(), "Controllers created");

    let mut callback = ProgressCallback::new();
    for episode in 0..config.episode.episodes {
        let episode_seed = seed.wrapping_add(u64::from(episode));
        arena.reset(episode_seed);
        clock.reset();
        callback.reset();

        let summary = runner::run_episode(&mut arena, &mut clock, &mut agents, &mut callback)?;
        runner::log_episode_end(&summary);
        info!(
            episode,
            degraded = callback.degraded(),
            summary = %serde_json::to_string(&summary)?,
            "Episode summary"
        );
    }
    Ok(())
}
