//! Per-episode reward accumulation.
//!
//! The ledger is exclusively owned by one controller. It keeps the running
//! episode return plus per-kind totals and counts so that a finished episode
//! can be broken down by reason. Nothing survives [`RewardLedger::finish`].

use std::collections::BTreeMap;

use capture_types::RewardKind;
use serde::{Deserialize, Serialize};

use crate::reward::table::RewardEvent;

/// Summary of one agent's rewards for a finished episode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EpisodeReturn {
    /// Sum of every reward in the episode.
    pub cumulative: f32,
    /// Sum of rewards per kind.
    pub totals: BTreeMap<RewardKind, f32>,
    /// Number of events per kind.
    pub counts: BTreeMap<RewardKind, u32>,
}

/// Running reward accumulator for the current episode.
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    cumulative: f32,
    totals: BTreeMap<RewardKind, f32>,
    counts: BTreeMap<RewardKind, u32>,
}

impl RewardLedger {
    /// An empty ledger.
    pub const fn new() -> Self {
        Self {
            cumulative: 0.0,
            totals: BTreeMap::new(),
            counts: BTreeMap::new(),
        }
    }

    /// Add one reward event.
    pub fn record(&mut self, event: RewardEvent) {
        self.cumulative += event.magnitude;
        *self.totals.entry(event.kind).or_insert(0.0) += event.magnitude;
        let count = self.counts.entry(event.kind).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Add several reward events, returning their sum.
    pub fn record_all(&mut self, events: &[RewardEvent]) -> f32 {
        events.iter().fold(0.0, |sum, event| {
            self.record(*event);
            sum + event.magnitude
        })
    }

    /// Episode return so far.
    pub const fn cumulative(&self) -> f32 {
        self.cumulative
    }

    /// Total reward recorded for `kind`.
    pub fn total_for(&self, kind: RewardKind) -> f32 {
        self.totals.get(&kind).copied().unwrap_or(0.0)
    }

    /// Number of events recorded for `kind`.
    pub fn count_for(&self, kind: RewardKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Close the episode: return its summary and reset the ledger.
    pub fn finish(&mut self) -> EpisodeReturn {
        let taken = std::mem::take(self);
        EpisodeReturn {
            cumulative: taken.cumulative,
            totals: taken.totals,
            counts: taken.counts,
        }
    }
}
