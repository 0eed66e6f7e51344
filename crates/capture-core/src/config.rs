//! Configuration loading and typed config structures for the capture arena.
//!
//! The canonical configuration lives in `capture-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every key is optional; a missing key takes the default listed on its
//! field.

use std::collections::BTreeMap;
use std::path::Path;

use capture_agents::{AgentError, EnemyCaptureBonus, PolicyConfig, RewardTable};
use capture_types::RewardKind;
use serde::Deserialize;

use crate::clock::{ClockError, EpisodeClock};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A policy threshold or reward override is invalid.
    #[error("invalid agent configuration: {source}")]
    Agent {
        /// The underlying validation error.
        #[from]
        source: AgentError,
    },

    /// A value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<ClockError> for ConfigError {
    fn from(err: ClockError) -> Self {
        Self::Invalid {
            reason: err.to_string(),
        }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `capture-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CaptureConfig {
    /// Episode timing and count.
    #[serde(default)]
    pub episode: EpisodeConfig,

    /// Decision thresholds.
    #[serde(default)]
    pub policy: PolicySection,

    /// Reward magnitude overrides keyed by reward kind.
    #[serde(default)]
    pub rewards: BTreeMap<RewardKind, f32>,

    /// Sandbox arena layout and physics.
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CaptureConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error if any value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error if any value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.episode.clock()?;
        self.policy_config().validate()?;
        self.reward_table()?;
        self.arena.validate()?;

        let turn_per_step = self.arena.turn_rate * self.episode.step_seconds;
        let dead_band_width = 2.0 * self.policy.heading_dead_band;
        if turn_per_step >= dead_band_width {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "arena.turn_rate * episode.step_seconds ({turn_per_step} deg) must be \
                     below the heading dead band width ({dead_band_width} deg)"
                ),
            });
        }
        if (self.arena.laser_range - self.policy.laser_range).abs() > f32::EPSILON {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "policy.laser_range ({}) must match arena.laser_range ({})",
                    self.policy.laser_range, self.arena.laser_range
                ),
            });
        }
        Ok(())
    }

    /// Policy thresholds for the decision core.
    pub fn policy_config(&self) -> PolicyConfig {
        self.policy.to_policy_config()
    }

    /// The default reward table with the configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Agent`] if an override is not finite.
    pub fn reward_table(&self) -> Result<RewardTable, ConfigError> {
        Ok(RewardTable::with_overrides(&self.rewards)?)
    }
}

/// Which action source drives the agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSourceKind {
    /// Always hold; the policy's navigation directives drive the agent.
    #[default]
    Stub,
    /// Uniformly random codes from a seeded generator.
    Random,
}

/// Episode timing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpisodeConfig {
    /// Episode length in seconds (default: 120).
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: f32,

    /// Fixed step length in seconds (default: 0.1).
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f32,

    /// Number of episodes the engine runs (default: 1).
    #[serde(default = "default_episodes")]
    pub episodes: u32,

    /// Random seed for arena layout and random actions (default: 42).
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Action source used by every agent (default: stub).
    #[serde(default)]
    pub action_source: ActionSourceKind,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            step_seconds: default_step_seconds(),
            episodes: default_episodes(),
            seed: default_seed(),
            action_source: ActionSourceKind::default(),
        }
    }
}

impl EpisodeConfig {
    /// Build a fresh clock for one episode.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the duration or step is not
    /// positive.
    pub fn clock(&self) -> Result<EpisodeClock, ClockError> {
        EpisodeClock::new(self.duration_seconds, self.step_seconds)
    }
}

/// Decision thresholds as they appear in YAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicySection {
    /// Remaining time at or below which the late phase applies (default: 60).
    #[serde(default = "default_late_phase_threshold")]
    pub late_phase_threshold: f32,

    /// Target search radius (default: 200).
    #[serde(default = "default_search_radius")]
    pub search_radius: f32,

    /// Heading dead band in degrees (default: 5).
    #[serde(default = "default_heading_dead_band")]
    pub heading_dead_band: f32,

    /// Laser range (default: 20).
    #[serde(default = "default_laser_range")]
    pub laser_range: f32,

    /// Carry count above which the agent is greedy (default: 2).
    #[serde(default = "default_greedy_carry_threshold")]
    pub greedy_carry_threshold: u32,

    /// Late-phase enemy capture bonus mode (default: disabled).
    #[serde(default)]
    pub enemy_capture_bonus: EnemyCaptureBonus,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            late_phase_threshold: default_late_phase_threshold(),
            search_radius: default_search_radius(),
            heading_dead_band: default_heading_dead_band(),
            laser_range: default_laser_range(),
            greedy_carry_threshold: default_greedy_carry_threshold(),
            enemy_capture_bonus: EnemyCaptureBonus::default(),
        }
    }
}

impl PolicySection {
    /// Convert to the decision core's config.
    pub const fn to_policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            late_phase_threshold: self.late_phase_threshold,
            search_radius: self.search_radius,
            heading_dead_band: self.heading_dead_band,
            laser_range: self.laser_range,
            greedy_carry_threshold: self.greedy_carry_threshold,
            enemy_capture_bonus: self.enemy_capture_bonus,
        }
    }
}

/// Sandbox arena configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArenaConfig {
    /// Half the side length of the square arena (default: 100).
    #[serde(default = "default_half_extent")]
    pub half_extent: f32,

    /// Number of collectible slots (default: 8).
    #[serde(default = "default_target_count")]
    pub target_count: u32,

    /// Agents per team (default: 1).
    #[serde(default = "default_agents_per_team")]
    pub agents_per_team: u32,

    /// Forward speed in units per second (default: 12).
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,

    /// Turn rate in degrees per second (default: 45). One step of turning
    /// must stay inside the heading dead band or steering never settles.
    #[serde(default = "default_turn_rate")]
    pub turn_rate: f32,

    /// Contact radius for collectibles and agents (default: 2).
    #[serde(default = "default_contact_radius")]
    pub contact_radius: f32,

    /// Radius of a home base trigger (default: 6).
    #[serde(default = "default_base_radius")]
    pub base_radius: f32,

    /// Laser range in the sandbox (default: 20).
    #[serde(default = "default_laser_range")]
    pub laser_range: f32,

    /// Laser cone half-angle in degrees (default: 10).
    #[serde(default = "default_laser_half_angle")]
    pub laser_half_angle: f32,

    /// How long a hit agent stays frozen, in seconds (default: 3).
    #[serde(default = "default_freeze_seconds")]
    pub freeze_seconds: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: default_half_extent(),
            target_count: default_target_count(),
            agents_per_team: default_agents_per_team(),
            move_speed: default_move_speed(),
            turn_rate: default_turn_rate(),
            contact_radius: default_contact_radius(),
            base_radius: default_base_radius(),
            laser_range: default_laser_range(),
            laser_half_angle: default_laser_half_angle(),
            freeze_seconds: default_freeze_seconds(),
        }
    }
}

impl ArenaConfig {
    /// Reject non-positive geometry and speeds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("half_extent", self.half_extent),
            ("move_speed", self.move_speed),
            ("turn_rate", self.turn_rate),
            ("contact_radius", self.contact_radius),
            ("base_radius", self.base_radius),
            ("laser_range", self.laser_range),
            ("laser_half_angle", self.laser_half_angle),
            ("freeze_seconds", self.freeze_seconds),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("arena.{name} must be positive, got {value}"),
                });
            }
        }
        if self.agents_per_team == 0 {
            return Err(ConfigError::Invalid {
                reason: "arena.agents_per_team must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (default: info).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable ones (default: false).
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_duration_seconds() -> f32 {
    120.0
}

const fn default_step_seconds() -> f32 {
    0.1
}

const fn default_episodes() -> u32 {
    1
}

const fn default_seed() -> u64 {
    42
}

const fn default_late_phase_threshold() -> f32 {
    60.0
}

const fn default_search_radius() -> f32 {
    200.0
}

const fn default_heading_dead_band() -> f32 {
    5.0
}

const fn default_laser_range() -> f32 {
    20.0
}

const fn default_greedy_carry_threshold() -> u32 {
    2
}

const fn default_half_extent() -> f32 {
    100.0
}

const fn default_target_count() -> u32 {
    8
}

const fn default_agents_per_team() -> u32 {
    1
}

const fn default_move_speed() -> f32 {
    12.0
}

const fn default_turn_rate() -> f32 {
    45.0
}

const fn default_contact_radius() -> f32 {
    2.0
}

const fn default_base_radius() -> f32 {
    6.0
}

const fn default_laser_half_angle() -> f32 {
    10.0
}

const fn default_freeze_seconds() -> f32 {
    3.0
}

fn default_log_level() -> String {
    "info".to_owned()
}
