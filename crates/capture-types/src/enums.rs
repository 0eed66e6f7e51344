//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Episode phase
// ---------------------------------------------------------------------------

/// The two time windows of an episode.
///
/// The phase is a pure function of the remaining time: strictly more than the
/// threshold is [`Phase::Early`], anything at or below it is [`Phase::Late`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Accumulate targets and bank them; ignore the opponent.
    Early,
    /// Contest the opponent and steal from its base.
    Late,
}

impl Phase {
    /// Select the phase for the given remaining time.
    pub fn from_remaining(remaining: f32, late_threshold: f32) -> Self {
        if remaining > late_threshold {
            Self::Early
        } else {
            Self::Late
        }
    }
}

// ---------------------------------------------------------------------------
// Reward kinds
// ---------------------------------------------------------------------------

/// Every reason the agent can be rewarded or penalised.
///
/// Magnitudes live in the reward table owned by each controller; this enum
/// only names the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    // --- Per-tick shaping ---
    /// The team has more captured targets than the enemy.
    TeamLeading,
    /// The team is tied or behind on captured targets.
    TeamTrailing,
    /// Carrying more targets than the greedy threshold allows.
    GreedyCarry,
    /// Per-target reward for every carried target.
    CarryPerTarget,
    /// The enemy's captured count dropped since the previous tick.
    EnemyCaptureDrop,

    // --- Contact events ---
    /// Entered the own home base while carrying at least one target.
    BaseDeposit,
    /// Entered the own home base empty-handed.
    EmptyBaseVisit,
    /// Touched a free, uncaptured target while able to act.
    TargetContact,
    /// Collided with an arena wall.
    WallContact,

    // --- Combat events from the game layer ---
    /// The agent was frozen by an enemy laser.
    Frozen,
    /// The agent fired its laser.
    ShootingLaser,
    /// The agent's laser hit the enemy.
    HitEnemy,
    /// The agent dropped a single carried target.
    DroppedOneTarget,
    /// The agent dropped several carried targets at once.
    DroppedTargets,
}

impl RewardKind {
    /// All reward kinds in declaration order.
    pub const ALL: [Self; 14] = [
        Self::TeamLeading,
        Self::TeamTrailing,
        Self::GreedyCarry,
        Self::CarryPerTarget,
        Self::EnemyCaptureDrop,
        Self::BaseDeposit,
        Self::EmptyBaseVisit,
        Self::TargetContact,
        Self::WallContact,
        Self::Frozen,
        Self::ShootingLaser,
        Self::HitEnemy,
        Self::DroppedOneTarget,
        Self::DroppedTargets,
    ];

    /// Stable snake-case name, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TeamLeading => "team_leading",
            Self::TeamTrailing => "team_trailing",
            Self::GreedyCarry => "greedy_carry",
            Self::CarryPerTarget => "carry_per_target",
            Self::EnemyCaptureDrop => "enemy_capture_drop",
            Self::BaseDeposit => "base_deposit",
            Self::EmptyBaseVisit => "empty_base_visit",
            Self::TargetContact => "target_contact",
            Self::WallContact => "wall_contact",
            Self::Frozen => "frozen",
            Self::ShootingLaser => "shooting_laser",
            Self::HitEnemy => "hit_enemy",
            Self::DroppedOneTarget => "dropped_one_target",
            Self::DroppedTargets => "dropped_targets",
        }
    }
}

impl core::fmt::Display for RewardKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Contact kinds
// ---------------------------------------------------------------------------

/// The kind of object an agent touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    /// A home base trigger volume.
    Base,
    /// A collectible target.
    Target,
    /// An arena wall.
    Wall,
    /// The opposing agent.
    Enemy,
}
