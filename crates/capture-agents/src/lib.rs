//! Decision and reward logic for capture arena agents.
//!
//! This crate holds everything that turns a world snapshot and an action
//! vector into motion and reward without touching the game layer. It sits
//! between `capture-types` (the data) and `capture-core` (the controller and
//! episode runner).
//!
//! # Modules
//!
//! - [`config`] -- Thresholds for phase, targeting and steering ([`PolicyConfig`])
//! - [`decoder`] -- Action vector decoding into per-axis intents
//! - [`error`] -- Construction errors ([`AgentError`]) and snapshot gaps ([`SnapshotError`])
//! - [`reward`] -- Reward table, phase-aware policy and episode ledger
//! - [`steering`] -- Turn-and-go heading controller ([`Steering`])
//! - [`targeting`] -- Nearest pursuable collectible selection

pub mod config;
pub mod decoder;
pub mod error;
pub mod reward;
pub mod steering;
pub mod targeting;

// Re-export primary types at crate root for convenience.
pub use config::{EnemyCaptureBonus, PolicyConfig};
pub use decoder::{base_intent, decode, encode};
pub use error::{AgentError, SnapshotError};
pub use reward::{
    EpisodeReturn, NavDirective, RewardEvent, RewardLedger, RewardPolicy, RewardTable,
    TickEvaluation,
};
pub use steering::{Steering, steer, steer_toward};
pub use targeting::{TargetPick, is_pursuable, nearest_target};
