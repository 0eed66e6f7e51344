//! Phase-aware reward shaping.
//!
//! The policy is evaluated once per decision tick and once per delivered
//! event. Tick evaluation produces the reward events for the tick plus an
//! ordered list of navigation directives; the caller applies the directives
//! in order, so a later directive overwrites the motion chosen by an earlier
//! one.
//!
//! ## Tick rules
//!
//! 1. Team standing, every tick: `TeamLeading` when the enemy has captured
//!    fewer targets than the agent's base holds, otherwise `TeamTrailing`.
//! 2. Early phase (remaining time above the threshold): seek the nearest
//!    target; if carrying more than the greedy threshold, seek base and
//!    apply `GreedyCarry`.
//! 3. Late phase: seek the nearest target; the greedy branch additionally
//!    requires the enemy to be closer than twice the laser range.
//! 4. Both phases: if carrying anything, seek base and apply
//!    `CarryPerTarget` scaled by the carried count. This stacks with the
//!    greedy penalty.
//! 5. Late phase only: the enemy-capture-drop bonus, see
//!    [`EnemyCaptureBonus`].
//!
//! Manual `seek_target`/`seek_base` requests from the decoded action come
//! first in the directive list, so the phase directives always win.
//!
//! If the agent, its base, the enemy or every target is missing from the
//! snapshot, the tick evaluates to no reward and no directives.

use capture_types::{
    AgentId, AgentState, CombatEvent, ContactEvent, ContactReport, DecodedAction, HomeBase, Phase,
    RewardKind, TeamId, WorldSnapshot,
};
use tracing::debug;

use crate::config::{EnemyCaptureBonus, PolicyConfig};
use crate::error::SnapshotError;
use crate::reward::table::{RewardEvent, RewardTable};

/// An autonomous navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirective {
    /// Steer toward the nearest pursuable target.
    SeekTarget,
    /// Steer toward the agent's own home base.
    SeekBase,
}

/// Result of evaluating one decision tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickEvaluation {
    /// Phase the tick was evaluated in; `None` when degraded.
    pub phase: Option<Phase>,
    /// Navigation directives in application order.
    pub directives: Vec<NavDirective>,
    /// Reward events for the tick.
    pub rewards: Vec<RewardEvent>,
    /// Why the evaluation degraded, if it did.
    pub degraded: Option<SnapshotError>,
}

impl TickEvaluation {
    /// A degraded evaluation: no rewards, no directives.
    pub fn degraded(reason: SnapshotError) -> Self {
        Self {
            degraded: Some(reason),
            ..Self::default()
        }
    }

    /// Sum of the tick's reward events.
    pub fn total(&self) -> f32 {
        self.rewards.iter().map(|r| r.magnitude).sum()
    }

    /// Whether `kind` was awarded this tick.
    pub fn has(&self, kind: RewardKind) -> bool {
        self.rewards.iter().any(|r| r.kind == kind)
    }
}

/// The snapshot entities tick evaluation depends on.
struct Collaborators<'a> {
    agent: &'a AgentState,
    base: &'a HomeBase,
    enemy: &'a AgentState,
}

fn resolve(world: &WorldSnapshot, agent_id: AgentId) -> Result<Collaborators<'_>, SnapshotError> {
    let agent = world
        .agent(agent_id)
        .ok_or(SnapshotError::UnknownAgent(agent_id))?;
    let base = world
        .base_of(agent.team)
        .ok_or(SnapshotError::MissingHomeBase(agent.team))?;
    let enemy = world
        .enemy_of(agent.team)
        .ok_or(SnapshotError::MissingEnemy(agent.team))?;
    if world.live_targets().next().is_none() {
        return Err(SnapshotError::NoTargets);
    }
    Ok(Collaborators { agent, base, enemy })
}

/// Reward shaping state for one agent.
///
/// The only state carried between ticks is the previous enemy captured count,
/// used by [`EnemyCaptureBonus::OnDecrease`]. It is cleared by
/// [`RewardPolicy::reset`].
#[derive(Debug, Clone)]
pub struct RewardPolicy {
    config: PolicyConfig,
    table: RewardTable,
    last_enemy_captured: Option<u32>,
}

impl RewardPolicy {
    /// Create a policy with the given thresholds and reward table.
    pub const fn new(config: PolicyConfig, table: RewardTable) -> Self {
        Self {
            config,
            table,
            last_enemy_captured: None,
        }
    }

    /// The thresholds in use.
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// The reward table in use.
    pub const fn table(&self) -> &RewardTable {
        &self.table
    }

    /// Forget per-episode state.
    pub const fn reset(&mut self) {
        self.last_enemy_captured = None;
    }

    /// Phase for a remaining time under this policy's threshold.
    pub fn phase(&self, remaining: f32) -> Phase {
        Phase::from_remaining(remaining, self.config.late_phase_threshold)
    }

    /// Evaluate the tick-level rules for `agent_id`.
    pub fn evaluate_tick(
        &mut self,
        world: &WorldSnapshot,
        agent_id: AgentId,
        decoded: &DecodedAction,
    ) -> TickEvaluation {
        let collab = match resolve(world, agent_id) {
            Ok(collab) => collab,
            Err(reason) => {
                debug!(agent = %agent_id, %reason, "tick evaluation degraded");
                return TickEvaluation::degraded(reason);
            }
        };

        let team = collab.agent.team;
        let carried = collab.agent.carried;
        let phase = self.phase(world.remaining_time);
        let mut eval = TickEvaluation {
            phase: Some(phase),
            ..TickEvaluation::default()
        };

        if decoded.seek_target {
            eval.directives.push(NavDirective::SeekTarget);
        }
        if decoded.seek_base {
            eval.directives.push(NavDirective::SeekBase);
        }

        let enemy_captured = world.enemy_captured(team);
        let standing = if enemy_captured < collab.base.captured {
            RewardKind::TeamLeading
        } else {
            RewardKind::TeamTrailing
        };
        eval.rewards.push(self.table.event(standing));

        eval.directives.push(NavDirective::SeekTarget);

        let greedy = carried > self.config.greedy_carry_threshold;
        let penalise_greed = match phase {
            Phase::Early => greedy,
            Phase::Late => {
                greedy
                    && collab.agent.position.distance(collab.enemy.position)
                        < self.config.enemy_threat_distance()
            }
        };
        if penalise_greed {
            eval.directives.push(NavDirective::SeekBase);
            eval.rewards.push(self.table.event(RewardKind::GreedyCarry));
        }

        if carried > 0 {
            eval.directives.push(NavDirective::SeekBase);
            eval.rewards
                .push(self.table.scaled(RewardKind::CarryPerTarget, carried));
        }

        if phase == Phase::Late && self.enemy_capture_dropped(enemy_captured) {
            eval.rewards
                .push(self.table.event(RewardKind::EnemyCaptureDrop));
        }
        self.last_enemy_captured = Some(enemy_captured);

        eval
    }

    fn enemy_capture_dropped(&self, enemy_captured: u32) -> bool {
        match self.config.enemy_capture_bonus {
            EnemyCaptureBonus::Disabled => false,
            EnemyCaptureBonus::OnDecrease => {
                enemy_captured > 0
                    && self
                        .last_enemy_captured
                        .is_some_and(|previous| enemy_captured < previous)
            }
        }
    }

    /// Score a collision or trigger contact for an agent on `team`.
    pub fn evaluate_contact(&self, team: TeamId, report: &ContactReport) -> Option<RewardEvent> {
        let kind = match report.event {
            ContactEvent::Base { team: base_team } if base_team == team => {
                if report.carried > 0 {
                    RewardKind::BaseDeposit
                } else {
                    RewardKind::EmptyBaseVisit
                }
            }
            // Only free targets score; one banked in any base, the enemy's
            // included, does not.
            ContactEvent::Target {
                carried_by: None,
                in_base: None,
            } if !report.frozen => RewardKind::TargetContact,
            ContactEvent::Wall => RewardKind::WallContact,
            ContactEvent::Base { .. }
            | ContactEvent::Target { .. }
            | ContactEvent::Enemy { .. } => return None,
        };
        Some(self.table.event(kind))
    }

    /// Score a laser or freeze outcome.
    pub fn evaluate_combat(&self, event: &CombatEvent) -> Option<RewardEvent> {
        let kind = match *event {
            CombatEvent::LaserFired => RewardKind::ShootingLaser,
            CombatEvent::HitEnemy => RewardKind::HitEnemy,
            CombatEvent::Frozen => RewardKind::Frozen,
            CombatEvent::Dropped { count: 0 } => return None,
            CombatEvent::Dropped { count: 1 } => RewardKind::DroppedOneTarget,
            CombatEvent::Dropped { .. } => RewardKind::DroppedTargets,
        };
        Some(self.table.event(kind))
    }
}
