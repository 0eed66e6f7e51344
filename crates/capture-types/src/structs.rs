//! Core entity structs: agents, collectibles, home bases and the snapshot
//! that bundles them.
//!
//! The snapshot is read-only to the decision core. Every query here is
//! total: missing entities come back as `None` and counts saturate, so the
//! reward path can degrade instead of failing.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::ids::{AgentId, TargetId, TeamId};

// ---------------------------------------------------------------------------
// AgentState
// ---------------------------------------------------------------------------

/// Physical and carry state of one agent, as reported by the game layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// The agent's identifier.
    pub id: AgentId,
    /// The agent's team.
    pub team: TeamId,
    /// Position in arena coordinates.
    pub position: Vec3,
    /// Heading in degrees, clockwise from `+z`.
    pub yaw: f32,
    /// World-space velocity.
    pub velocity: Vec3,
    /// Number of targets currently carried.
    pub carried: u32,
    /// Whether the agent is frozen by a laser hit.
    pub frozen: bool,
}

impl AgentState {
    /// Create an agent at rest with nothing carried.
    pub const fn new(id: AgentId, team: TeamId, position: Vec3, yaw: f32) -> Self {
        Self {
            id,
            team,
            position,
            yaw,
            velocity: Vec3::ZERO,
            carried: 0,
            frozen: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Collectible
// ---------------------------------------------------------------------------

/// A neutral object that can be carried and deposited in a home base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// The collectible's identifier.
    pub id: TargetId,
    /// Position in arena coordinates.
    pub position: Vec3,
    /// Team currently carrying it, if any.
    pub carried_by: Option<TeamId>,
    /// Team whose base holds it, if any.
    pub in_base: Option<TeamId>,
}

impl Collectible {
    /// Create a free collectible lying in the field.
    pub const fn free(id: TargetId, position: Vec3) -> Self {
        Self {
            id,
            position,
            carried_by: None,
            in_base: None,
        }
    }

    /// A collectible is never simultaneously carried and deposited.
    pub const fn is_consistent(&self) -> bool {
        !(self.carried_by.is_some() && self.in_base.is_some())
    }

    /// Whether nobody is carrying it.
    pub const fn is_uncarried(&self) -> bool {
        self.carried_by.is_none()
    }
}

// ---------------------------------------------------------------------------
// HomeBase
// ---------------------------------------------------------------------------

/// A team's home base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeBase {
    /// Owning team.
    pub team: TeamId,
    /// Position of the base centre.
    pub position: Vec3,
    /// Number of collectibles deposited in this base.
    pub captured: u32,
}

// ---------------------------------------------------------------------------
// WorldSnapshot
// ---------------------------------------------------------------------------

/// Read-only view of the arena for one decision tick.
///
/// Target slots keep a stable order for the observation vector. A `None`
/// slot is a collectible that was destroyed after the slot list was built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Remaining episode time.
    pub remaining_time: f32,
    /// Every agent in the arena.
    pub agents: Vec<AgentState>,
    /// Collectible slots in stable order.
    pub targets: Vec<Option<Collectible>>,
    /// Every home base.
    pub bases: Vec<HomeBase>,
}

impl WorldSnapshot {
    /// Look up an agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// The first agent on a team other than `team`.
    pub fn enemy_of(&self, team: TeamId) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.team != team)
    }

    /// The home base belonging to `team`.
    pub fn base_of(&self, team: TeamId) -> Option<&HomeBase> {
        self.bases.iter().find(|b| b.team == team)
    }

    /// Live collectibles, skipping destroyed slots.
    pub fn live_targets(&self) -> impl Iterator<Item = &Collectible> {
        self.targets.iter().flatten()
    }

    /// Number of collectibles deposited in any base.
    pub fn total_captured(&self) -> u32 {
        let count = self.live_targets().filter(|t| t.in_base.is_some()).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Captured count of `team`'s own base (0 when the base is missing).
    pub fn friendly_captured(&self, team: TeamId) -> u32 {
        self.base_of(team).map_or(0, |b| b.captured)
    }

    /// Collectibles captured by every team other than `team`.
    pub fn enemy_captured(&self, team: TeamId) -> u32 {
        self.total_captured()
            .saturating_sub(self.friendly_captured(team))
    }

    /// Check the home-base invariant: each base's count equals the number of
    /// live collectibles deposited there.
    pub fn base_counts_consistent(&self) -> bool {
        self.bases.iter().all(|base| {
            let deposited = self
                .live_targets()
                .filter(|t| t.in_base == Some(base.team))
                .count();
            u32::try_from(deposited).is_ok_and(|d| d == base.captured)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn team(raw: u8) -> TeamId {
        TeamId::new(raw).unwrap()
    }

    fn deposited(in_base: u8) -> Option<Collectible> {
        Some(Collectible {
            in_base: TeamId::new(in_base),
            ..Collectible::free(TargetId::new(), Vec3::ZERO)
        })
    }

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot {
            remaining_time: 90.0,
            agents: vec![
                AgentState::new(AgentId::new(), team(1), Vec3::ZERO, 0.0),
                AgentState::new(AgentId::new(), team(2), Vec3::flat(10.0, 0.0), 0.0),
            ],
            targets: vec![deposited(1), deposited(2), deposited(2), None, deposited(0)],
            bases: vec![
                HomeBase { team: team(1), position: Vec3::flat(-50.0, 0.0), captured: 1 },
                HomeBase { team: team(2), position: Vec3::flat(50.0, 0.0), captured: 2 },
            ],
        }
    }

    #[test]
    fn captured_counts_split_by_team() {
        let snap = snapshot();
        assert_eq!(snap.total_captured(), 3);
        assert_eq!(snap.friendly_captured(team(1)), 1);
        assert_eq!(snap.enemy_captured(team(1)), 2);
        assert_eq!(snap.enemy_captured(team(2)), 1);
    }

    #[test]
    fn missing_base_counts_as_zero() {
        let mut snap = snapshot();
        snap.bases.clear();
        assert_eq!(snap.friendly_captured(team(1)), 0);
        assert_eq!(snap.enemy_captured(team(1)), 3);
    }

    #[test]
    fn enemy_lookup_skips_own_team() {
        let snap = snapshot();
        let enemy = snap.enemy_of(team(1)).unwrap();
        assert_eq!(enemy.team, team(2));
    }

    #[test]
    fn base_invariant_detects_mismatch() {
        let mut snap = snapshot();
        assert!(snap.base_counts_consistent());
        if let Some(base) = snap.bases.first_mut() {
            base.captured = 5;
        }
        assert!(!snap.base_counts_consistent());
    }

    #[test]
    fn carried_and_deposited_is_inconsistent() {
        let mut c = Collectible::free(TargetId::new(), Vec3::ZERO);
        assert!(c.is_consistent());
        c.carried_by = TeamId::new(1);
        c.in_base = TeamId::new(2);
        assert!(!c.is_consistent());
    }
}
