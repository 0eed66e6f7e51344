//! Per-agent controller tying decoding, navigation and reward together.
//!
//! The controller owns nothing of the arena. Each tick it is handed the
//! current [`WorldSnapshot`], the action vector chosen for it and the
//! [`PhysicsSink`] that will execute the resulting motion. Contact and
//! combat events are delivered through [`AgentController::on_contact`] and
//! [`AgentController::on_combat`] as they happen.
//!
//! # Tick sequence
//!
//! 1. Decode the action vector into per-axis intents.
//! 2. Evaluate the reward policy, which yields rewards and an ordered list of
//!    navigation directives.
//! 3. Apply the directives in order on top of the manual intent; each one
//!    overwrites translation and rotation, the laser stays as decoded.
//! 4. Submit the final intent to physics and record the rewards.

use capture_agents::{
    EpisodeReturn, NavDirective, PolicyConfig, RewardEvent, RewardLedger, RewardPolicy,
    RewardTable, SnapshotError, Steering, TargetPick, base_intent, decode, nearest_target,
    steer_toward,
};
use capture_types::{
    ActionVector, AgentId, AgentState, CombatEvent, ContactReport, MotionIntent, Observation,
    Phase, TeamId, WorldSnapshot,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::clock::EpisodeTimer;
use crate::perception::observe;

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Receives the motion command for one agent each tick.
pub trait PhysicsSink {
    /// Execute `intent` for `agent` on the next physics step.
    fn submit(&mut self, agent: AgentId, intent: &MotionIntent);
}

/// Produces read-only arena snapshots.
pub trait WorldSource {
    /// Snapshot the arena with the remaining time read from `timer`.
    fn snapshot(&self, timer: &dyn EpisodeTimer) -> WorldSnapshot;
}

/// A [`PhysicsSink`] that only records what it was sent.
#[derive(Debug, Clone, Default)]
pub struct MotionBuffer {
    submitted: Vec<(AgentId, MotionIntent)>,
}

impl MotionBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent intent submitted for `agent`.
    pub fn last_for(&self, agent: AgentId) -> Option<MotionIntent> {
        self.submitted
            .iter()
            .rev()
            .find(|(id, _)| *id == agent)
            .map(|(_, intent)| *intent)
    }

    /// Everything submitted so far, in order.
    pub fn submitted(&self) -> &[(AgentId, MotionIntent)] {
        &self.submitted
    }

    /// Remove and return everything submitted so far.
    pub fn drain(&mut self) -> Vec<(AgentId, MotionIntent)> {
        std::mem::take(&mut self.submitted)
    }
}

impl PhysicsSink for MotionBuffer {
    fn submit(&mut self, agent: AgentId, intent: &MotionIntent) {
        self.submitted.push((agent, *intent));
    }
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// What happened to one agent during one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// The agent.
    pub agent: AgentId,
    /// Tick index within the episode, starting at 0.
    pub tick: u64,
    /// Phase the tick was evaluated in; `None` when degraded.
    pub phase: Option<Phase>,
    /// Motion submitted to physics.
    pub intent: MotionIntent,
    /// Rewards recorded this tick.
    pub rewards: Vec<RewardEvent>,
    /// Sum of `rewards`.
    pub reward: f32,
    /// Collectible steered toward, if a target directive found one.
    #[serde(skip)]
    pub target: Option<TargetPick>,
    /// Why the tick degraded, if it did.
    #[serde(skip)]
    pub degraded: Option<SnapshotError>,
}

// ---------------------------------------------------------------------------
// AgentController
// ---------------------------------------------------------------------------

/// Decision and reward state for one agent.
#[derive(Debug, Clone)]
pub struct AgentController {
    agent_id: AgentId,
    team: TeamId,
    policy: RewardPolicy,
    ledger: RewardLedger,
    ticks: u64,
}

impl AgentController {
    /// Create a controller for `agent_id` on `team`.
    pub const fn new(
        agent_id: AgentId,
        team: TeamId,
        config: PolicyConfig,
        table: RewardTable,
    ) -> Self {
        Self {
            agent_id,
            team,
            policy: RewardPolicy::new(config, table),
            ledger: RewardLedger::new(),
            ticks: 0,
        }
    }

    /// The controlled agent.
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// The controlled agent's team.
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Ticks processed in the current episode.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The observation for this agent.
    pub fn observe(&self, world: &WorldSnapshot) -> Observation {
        observe(world, self.agent_id)
    }

    /// Run one decision tick.
    pub fn tick(
        &mut self,
        world: &WorldSnapshot,
        action: &ActionVector,
        physics: &mut dyn PhysicsSink,
    ) -> TickReport {
        let decoded = decode(action);
        let eval = self.policy.evaluate_tick(world, self.agent_id, &decoded);

        let mut intent = base_intent(&decoded);
        let mut target = None;
        match (eval.degraded, world.agent(self.agent_id)) {
            (None, Some(agent)) => {
                for directive in &eval.directives {
                    match self.navigate(world, agent, *directive) {
                        Some((steering, pick)) => {
                            steering.apply(&mut intent);
                            if pick.is_some() {
                                target = pick;
                            }
                        }
                        None => trace!(agent = %self.agent_id, ?directive, "no destination"),
                    }
                }
            }
            _ => intent = MotionIntent::hold(),
        }

        physics.submit(self.agent_id, &intent);
        let reward = self.ledger.record_all(&eval.rewards);

        let report = TickReport {
            agent: self.agent_id,
            tick: self.ticks,
            phase: eval.phase,
            intent,
            rewards: eval.rewards,
            reward,
            target,
            degraded: eval.degraded,
        };
        self.ticks = self.ticks.saturating_add(1);

        debug!(
            agent = %self.agent_id,
            tick = report.tick,
            phase = ?report.phase,
            reward = report.reward,
            cumulative = self.ledger.cumulative(),
            "tick evaluated"
        );
        report
    }

    /// Resolve one directive to a steering decision.
    fn navigate(
        &self,
        world: &WorldSnapshot,
        agent: &AgentState,
        directive: NavDirective,
    ) -> Option<(Steering, Option<TargetPick>)> {
        let config = self.policy.config();
        match directive {
            NavDirective::SeekTarget => {
                let pick = nearest_target(
                    &world.targets,
                    agent.position,
                    self.team,
                    config.search_radius,
                )?;
                let steering = steer_toward(agent, pick.position, config.heading_dead_band);
                Some((steering, Some(pick)))
            }
            NavDirective::SeekBase => {
                let base = world.base_of(self.team)?;
                let steering = steer_toward(agent, base.position, config.heading_dead_band);
                Some((steering, None))
            }
        }
    }

    /// Score a contact involving this agent.
    ///
    /// Reports addressed to another agent are ignored.
    pub fn on_contact(&mut self, report: &ContactReport) -> Option<RewardEvent> {
        if report.agent != self.agent_id {
            return None;
        }
        let reward = self.policy.evaluate_contact(self.team, report)?;
        self.ledger.record(reward);
        debug!(
            agent = %self.agent_id,
            kind = %reward.kind,
            magnitude = reward.magnitude,
            "contact reward"
        );
        Some(reward)
    }

    /// Score a combat outcome for this agent.
    pub fn on_combat(&mut self, event: &CombatEvent) -> Option<RewardEvent> {
        let reward = self.policy.evaluate_combat(event)?;
        self.ledger.record(reward);
        debug!(
            agent = %self.agent_id,
            kind = %reward.kind,
            magnitude = reward.magnitude,
            "combat reward"
        );
        Some(reward)
    }

    /// Episode return so far.
    pub const fn cumulative_reward(&self) -> f32 {
        self.ledger.cumulative()
    }

    /// The reward ledger for the current episode.
    pub const fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    /// Close the episode and reset every per-episode accumulator.
    pub fn end_episode(&mut self) -> EpisodeReturn {
        self.policy.reset();
        self.ticks = 0;
        self.ledger.finish()
    }
}
