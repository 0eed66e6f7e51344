//! Episode loop runner.
//!
//! This module provides [`run_episode`], which drives one episode against an
//! [`Arena`] in fixed steps:
//!
//! 1. Snapshot the arena with the clock's remaining time.
//! 2. For every agent: build its observation, ask its action source, run the
//!    controller tick (which submits motion to the arena).
//! 3. Step the arena and route the contact and combat events it reports to
//!    the addressed controllers.
//! 4. Advance the clock.
//!
//! When the clock reaches zero every controller's episode is closed and an
//! [`EpisodeSummary`] is returned.

use std::collections::BTreeMap;

use capture_agents::EpisodeReturn;
use capture_types::{ActionVector, AgentId, ArenaEvent, ContactKind, TeamId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::{ClockError, EpisodeClock};
use crate::controller::{AgentController, PhysicsSink, TickReport, WorldSource};
use crate::decision::ActionSource;

/// Errors that can occur during an episode run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The episode was started without any agents.
    #[error("episode has no agents")]
    NoAgents,
}

/// The physical arena an episode runs in.
///
/// The arena snapshots its state, accepts motion commands and advances its
/// own physics. Events raised during a step are returned so the runner can
/// deliver them before the next tick.
pub trait Arena: WorldSource + PhysicsSink {
    /// Advance physics by `dt` seconds.
    fn step(&mut self, dt: f32) -> Vec<ArenaEvent>;

    /// Restore the starting layout for a new episode.
    fn reset(&mut self, seed: u64);
}

/// A controller paired with the source of its actions.
pub struct EpisodeAgent {
    /// The agent's controller.
    pub controller: AgentController,
    /// Where the agent's action vectors come from.
    pub source: Box<dyn ActionSource>,
}

impl core::fmt::Debug for EpisodeAgent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EpisodeAgent")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

/// Callback invoked after each agent tick.
pub trait TickCallback {
    /// Called with the report of one agent's tick.
    fn on_tick(&mut self, report: &TickReport);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _report: &TickReport) {}
}

/// One agent's result for a finished episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentResult {
    /// The agent.
    pub agent: AgentId,
    /// The agent's team.
    pub team: TeamId,
    /// Reward breakdown.
    #[serde(rename = "return")]
    pub episode_return: EpisodeReturn,
}

/// Result of one episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    /// Unique id of this episode run.
    pub episode_id: Uuid,
    /// Wall-clock start time.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end time.
    pub ended_at: DateTime<Utc>,
    /// Fixed steps executed.
    pub ticks: u64,
    /// Targets in each team's base at the end.
    pub captured: BTreeMap<TeamId, u32>,
    /// The team with the most captured targets, if there is a single one.
    pub winner: Option<TeamId>,
    /// Contacts delivered during the episode, by kind.
    pub contacts: BTreeMap<ContactKind, u32>,
    /// Per-agent reward results.
    pub agents: Vec<AgentResult>,
}

impl EpisodeSummary {
    /// Return of `agent`, if it took part.
    pub fn return_of(&self, agent: AgentId) -> Option<&EpisodeReturn> {
        self.agents
            .iter()
            .find(|a| a.agent == agent)
            .map(|a| &a.episode_return)
    }
}

fn winner(captured: &BTreeMap<TeamId, u32>) -> Option<TeamId> {
    let best = captured.values().copied().max()?;
    let mut leaders = captured.iter().filter(|&(_, &n)| n == best);
    let (team, _) = leaders.next()?;
    if leaders.next().is_some() {
        None
    } else {
        Some(*team)
    }
}

fn route_event(
    agents: &mut [EpisodeAgent],
    event: &ArenaEvent,
    contacts: &mut BTreeMap<ContactKind, u32>,
) {
    let Some(agent) = agents
        .iter_mut()
        .find(|a| a.controller.agent_id() == event.agent())
    else {
        warn!(agent = %event.agent(), "event for unknown agent dropped");
        return;
    };
    match event {
        ArenaEvent::Contact(report) => {
            let count = contacts.entry(report.event.kind()).or_insert(0);
            *count = count.saturating_add(1);
            agent.controller.on_contact(report);
        }
        ArenaEvent::Combat { event, .. } => {
            agent.controller.on_combat(event);
        }
    }
}

/// Run one episode until the clock expires.
///
/// The clock and the arena are reset by the caller; this function only
/// consumes the remaining time.
///
/// # Errors
///
/// Returns [`RunnerError::NoAgents`] if `agents` is empty, or
/// [`RunnerError::Clock`] if the clock cannot advance.
pub fn run_episode<A: Arena>(
    arena: &mut A,
    clock: &mut EpisodeClock,
    agents: &mut [EpisodeAgent],
    callback: &mut dyn TickCallback,
) -> Result<EpisodeSummary, RunnerError> {
    if agents.is_empty() {
        return Err(RunnerError::NoAgents);
    }

    let episode_id = Uuid::now_v7();
    let started_at = Utc::now();
    info!(
        %episode_id,
        agents = agents.len(),
        duration = clock.duration(),
        step = clock.step_seconds(),
        "Episode starting"
    );

    let mut contacts = BTreeMap::new();
    while !clock.expired() {
        let world = arena.snapshot(&*clock);

        for agent in agents.iter_mut() {
            let id = agent.controller.agent_id();
            let observation = agent.controller.observe(&world);
            let action = agent.source.choose(id, &observation).unwrap_or_else(|err| {
                warn!(agent = %id, error = %err, "action source failed, holding");
                ActionVector::hold()
            });
            let report = agent.controller.tick(&world, &action, arena);
            callback.on_tick(&report);
        }

        for event in arena.step(clock.step_seconds()) {
            route_event(agents, &event, &mut contacts);
        }

        clock.advance()?;
    }

    let final_world = arena.snapshot(&*clock);
    let captured: BTreeMap<TeamId, u32> = final_world
        .bases
        .iter()
        .map(|b| (b.team, b.captured))
        .collect();

    let results = agents
        .iter_mut()
        .map(|a| AgentResult {
            agent: a.controller.agent_id(),
            team: a.controller.team(),
            episode_return: a.controller.end_episode(),
        })
        .collect();

    Ok(EpisodeSummary {
        episode_id,
        started_at,
        ended_at: Utc::now(),
        ticks: clock.steps(),
        winner: winner(&captured),
        captured,
        contacts,
        agents: results,
    })
}

/// Log the end of an episode.
pub fn log_episode_end(summary: &EpisodeSummary) {
    let elapsed_ms = summary
        .ended_at
        .signed_duration_since(summary.started_at)
        .num_milliseconds();
    info!(
        episode_id = %summary.episode_id,
        ticks = summary.ticks,
        elapsed_ms,
        winner = ?summary.winner,
        captured = ?summary.captured,
        contacts = ?summary.contacts,
        "Episode ended"
    );

    if summary.agents.is_empty() {
        warn!("Episode ended with no agents");
    }
    for result in &summary.agents {
        info!(
            agent = %result.agent,
            team = %result.team,
            cumulative = result.episode_return.cumulative,
            "Agent return"
        );
    }
}
