//! Tunable parameters for targeting, steering and phase logic.
//!
//! The [`PolicyConfig`] struct bundles every threshold the decision core uses
//! so that callers (the controller, tests, the YAML loader in
//! `capture-core`) can override the defaults in one place.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// How the late-phase "enemy captured count decreased" bonus is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyCaptureBonus {
    /// Never granted.
    #[default]
    Disabled,
    /// Granted when the enemy's captured count is non-zero and lower than on
    /// the previous evaluated tick.
    OnDecrease,
}

/// Configuration for the phase-aware decision and reward logic.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Remaining time at or below which the late phase applies (default: 60).
    pub late_phase_threshold: f32,

    /// Collectibles at or beyond this horizontal distance are never
    /// selected (default: 200).
    pub search_radius: f32,

    /// Half-width of the heading dead band, in degrees (default: 5).
    pub heading_dead_band: f32,

    /// Laser range; the late-phase greedy penalty applies when the enemy is
    /// closer than twice this (default: 20).
    pub laser_range: f32,

    /// Carrying strictly more than this is greedy (default: 2).
    pub greedy_carry_threshold: u32,

    /// Late-phase enemy capture bonus mode (default: disabled).
    pub enemy_capture_bonus: EnemyCaptureBonus,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            late_phase_threshold: 60.0,
            search_radius: 200.0,
            heading_dead_band: 5.0,
            laser_range: 20.0,
            greedy_carry_threshold: 2,
            enemy_capture_bonus: EnemyCaptureBonus::Disabled,
        }
    }
}

impl PolicyConfig {
    /// Enemy distance below which carrying too much is penalised late in the
    /// episode.
    pub fn enemy_threat_distance(&self) -> f32 {
        self.laser_range * 2.0
    }

    /// Reject non-finite or negative thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidPolicyConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), AgentError> {
        let fields = [
            ("late_phase_threshold", self.late_phase_threshold),
            ("search_radius", self.search_radius),
            ("heading_dead_band", self.heading_dead_band),
            ("laser_range", self.laser_range),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AgentError::InvalidPolicyConfig {
                    reason: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        if self.heading_dead_band >= 180.0 {
            return Err(AgentError::InvalidPolicyConfig {
                reason: format!(
                    "heading_dead_band must be below 180 degrees, got {}",
                    self.heading_dead_band
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PolicyConfig::default();
        assert!((cfg.late_phase_threshold - 60.0).abs() < f32::EPSILON);
        assert!((cfg.search_radius - 200.0).abs() < f32::EPSILON);
        assert!((cfg.heading_dead_band - 5.0).abs() < f32::EPSILON);
        assert!((cfg.enemy_threat_distance() - 40.0).abs() < f32::EPSILON);
        assert_eq!(cfg.greedy_carry_threshold, 2);
        assert_eq!(cfg.enemy_capture_bonus, EnemyCaptureBonus::Disabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let cfg = PolicyConfig {
            search_radius: -1.0,
            ..PolicyConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AgentError::InvalidPolicyConfig { .. })
        ));
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let cfg = PolicyConfig {
            late_phase_threshold: f32::NAN,
            ..PolicyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bonus_mode_parses_snake_case() {
        let mode: EnemyCaptureBonus = serde_json::from_str("\"on_decrease\"").unwrap_or_default();
        assert_eq!(mode, EnemyCaptureBonus::OnDecrease);
    }
}
