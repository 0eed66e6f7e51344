//! Events delivered by the game layer outside the decision tick.
//!
//! Contacts come from the collision/trigger system, combat events from the
//! laser and freeze system. Both carry the state needed to score them at the
//! moment they happened, because the game layer may mutate the arena (for
//! example deposit carried targets) right after delivering the event.

use serde::{Deserialize, Serialize};

use crate::enums::ContactKind;
use crate::ids::{AgentId, TeamId};

/// What the agent touched, with the attributes of the other object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactEvent {
    /// Entered a home base trigger.
    Base {
        /// Team owning the base.
        team: TeamId,
    },
    /// Collided with a collectible.
    Target {
        /// Team carrying the collectible, if any.
        carried_by: Option<TeamId>,
        /// Team whose base holds the collectible, if any.
        in_base: Option<TeamId>,
    },
    /// Collided with an arena wall.
    Wall,
    /// Collided with the opposing agent.
    Enemy {
        /// The opponent's team.
        team: TeamId,
    },
}

impl ContactEvent {
    /// The untagged kind of this contact.
    pub const fn kind(&self) -> ContactKind {
        match self {
            Self::Base { .. } => ContactKind::Base,
            Self::Target { .. } => ContactKind::Target,
            Self::Wall => ContactKind::Wall,
            Self::Enemy { .. } => ContactKind::Enemy,
        }
    }
}

/// A contact together with the receiving agent's state at contact time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReport {
    /// The agent that made contact.
    pub agent: AgentId,
    /// Targets the agent was carrying when contact happened.
    pub carried: u32,
    /// Whether the agent was frozen when contact happened.
    pub frozen: bool,
    /// What was touched.
    pub event: ContactEvent,
}

/// Laser and freeze outcomes reported by the game layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatEvent {
    /// The agent switched its laser on this step.
    LaserFired,
    /// The agent's laser hit the opponent.
    HitEnemy,
    /// The agent was frozen by the opponent's laser.
    Frozen,
    /// The agent dropped carried targets.
    Dropped {
        /// Number of targets dropped.
        count: u32,
    },
}

/// Any out-of-tick event, addressed to one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArenaEvent {
    /// A collision or trigger contact.
    Contact(ContactReport),
    /// A combat outcome.
    Combat {
        /// The agent the outcome applies to.
        agent: AgentId,
        /// What happened.
        event: CombatEvent,
    },
}

impl ArenaEvent {
    /// The agent this event is addressed to.
    pub const fn agent(&self) -> AgentId {
        match self {
            Self::Contact(report) => report.agent,
            Self::Combat { agent, .. } => *agent,
        }
    }
}
