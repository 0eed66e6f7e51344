//! Error types for the capture-agents crate.
//!
//! Only construction can fail. Per-tick evaluation never returns an error to
//! the learning collaborator; a [`SnapshotError`] is reported alongside a
//! degraded (zero-reward, hold) result instead.

use capture_types::{AgentId, RewardKind, TeamId};

/// Errors raised while building reward tables and policy configuration.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A reward magnitude is NaN or infinite.
    #[error("reward magnitude for {kind} must be finite, got {value}")]
    InvalidRewardMagnitude {
        /// The reward kind being configured.
        kind: RewardKind,
        /// The rejected magnitude.
        value: f32,
    },

    /// A policy parameter is out of range.
    #[error("invalid policy configuration: {reason}")]
    InvalidPolicyConfig {
        /// Description of what is wrong.
        reason: String,
    },
}

/// A collaborator the reward policy needs is missing from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The evaluating agent is not in the snapshot.
    #[error("agent {0} not present in snapshot")]
    UnknownAgent(AgentId),

    /// The agent's own home base is not in the snapshot.
    #[error("home base for {0} not present in snapshot")]
    MissingHomeBase(TeamId),

    /// No opposing agent is in the snapshot.
    #[error("no enemy of {0} present in snapshot")]
    MissingEnemy(TeamId),

    /// The snapshot has no live collectibles.
    #[error("snapshot has no live targets")]
    NoTargets,
}
