//! Reward shaping for capture arena agents.
//!
//! # Submodules
//!
//! - [`table`] -- Reward magnitudes per [`RewardKind`](capture_types::RewardKind).
//! - [`policy`] -- Phase-aware tick, contact and combat evaluation.
//! - [`ledger`] -- Per-episode accumulation and breakdown.

pub mod ledger;
pub mod policy;
pub mod table;

pub use ledger::{EpisodeReturn, RewardLedger};
pub use policy::{NavDirective, RewardPolicy, TickEvaluation};
pub use table::{RewardEvent, RewardTable, default_magnitude};
