//! Reward magnitudes keyed by [`RewardKind`].
//!
//! The table is built once when a controller is created and is read-only for
//! the rest of the episode. Kinds without an entry score `0`.

use std::collections::BTreeMap;

use capture_types::RewardKind;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// One scored reason, ready to be added to the episode ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardEvent {
    /// Why the reward was given.
    pub kind: RewardKind,
    /// Signed reward value.
    pub magnitude: f32,
}

/// Default magnitude for every reward kind.
pub const fn default_magnitude(kind: RewardKind) -> f32 {
    match kind {
        RewardKind::TeamLeading => 0.5,
        RewardKind::TeamTrailing | RewardKind::EmptyBaseVisit => -0.1,
        RewardKind::GreedyCarry => -5.0,
        RewardKind::CarryPerTarget | RewardKind::BaseDeposit => 1.0,
        RewardKind::EnemyCaptureDrop => 0.2,
        RewardKind::TargetContact | RewardKind::HitEnemy => 0.1,
        RewardKind::WallContact | RewardKind::ShootingLaser => -1.0,
        RewardKind::Frozen => -0.6,
        RewardKind::DroppedOneTarget | RewardKind::DroppedTargets => 0.0,
    }
}

/// Mapping from reward kind to magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardTable {
    magnitudes: BTreeMap<RewardKind, f32>,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            magnitudes: RewardKind::ALL
                .iter()
                .map(|&kind| (kind, default_magnitude(kind)))
                .collect(),
        }
    }
}

impl RewardTable {
    /// Build the default table with selected magnitudes replaced.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidRewardMagnitude`] if any override is not
    /// finite.
    pub fn with_overrides(overrides: &BTreeMap<RewardKind, f32>) -> Result<Self, AgentError> {
        let mut table = Self::default();
        for (&kind, &value) in overrides {
            table.set(kind, value)?;
        }
        Ok(table)
    }

    /// Replace one magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidRewardMagnitude`] if `value` is not finite.
    pub fn set(&mut self, kind: RewardKind, value: f32) -> Result<(), AgentError> {
        if !value.is_finite() {
            return Err(AgentError::InvalidRewardMagnitude { kind, value });
        }
        self.magnitudes.insert(kind, value);
        Ok(())
    }

    /// Magnitude for `kind`.
    pub fn magnitude(&self, kind: RewardKind) -> f32 {
        self.magnitudes.get(&kind).copied().unwrap_or(0.0)
    }

    /// A reward event for `kind` at its table magnitude.
    pub fn event(&self, kind: RewardKind) -> RewardEvent {
        RewardEvent {
            kind,
            magnitude: self.magnitude(kind),
        }
    }

    /// A reward event for `kind` scaled by a count.
    pub fn scaled(&self, kind: RewardKind, count: u32) -> RewardEvent {
        RewardEvent {
            kind,
            magnitude: self.magnitude(kind) * count_as_f32(count),
        }
    }
}

/// Convert a small count to `f32` without a lossy cast.
pub fn count_as_f32(count: u32) -> f32 {
    u16::try_from(count).map_or(f32::from(u16::MAX), f32::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn default_table_matches_shaping_constants() {
        let table = RewardTable::default();
        assert!(close(table.magnitude(RewardKind::TeamLeading), 0.5));
        assert!(close(table.magnitude(RewardKind::TeamTrailing), -0.1));
        assert!(close(table.magnitude(RewardKind::GreedyCarry), -5.0));
        assert!(close(table.magnitude(RewardKind::CarryPerTarget), 1.0));
        assert!(close(table.magnitude(RewardKind::WallContact), -1.0));
        assert!(close(table.magnitude(RewardKind::TargetContact), 0.1));
        assert!(close(table.magnitude(RewardKind::Frozen), -0.6));
        assert!(close(table.magnitude(RewardKind::ShootingLaser), -1.0));
        assert!(close(table.magnitude(RewardKind::DroppedTargets), 0.0));
    }

    #[test]
    fn overrides_replace_only_named_kinds() {
        let mut overrides = BTreeMap::new();
        overrides.insert(RewardKind::WallContact, -2.5);
        let table = RewardTable::with_overrides(&overrides).unwrap();
        assert!(close(table.magnitude(RewardKind::WallContact), -2.5));
        assert!(close(table.magnitude(RewardKind::BaseDeposit), 1.0));
    }

    #[test]
    fn non_finite_override_is_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert(RewardKind::HitEnemy, f32::INFINITY);
        assert!(matches!(
            RewardTable::with_overrides(&overrides),
            Err(AgentError::InvalidRewardMagnitude { kind: RewardKind::HitEnemy, .. })
        ));
    }

    #[test]
    fn scaled_is_linear_in_count() {
        let table = RewardTable::default();
        for k in 1..=6 {
            let event = table.scaled(RewardKind::CarryPerTarget, k);
            assert!(close(event.magnitude, count_as_f32(k)));
        }
    }
}
