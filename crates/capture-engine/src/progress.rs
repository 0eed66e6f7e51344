//! Tick callback that tracks episode progress for the logs.
//!
//! Counts agent ticks and degraded evaluations, and logs a heartbeat at a
//! fixed tick interval so long episodes show signs of life at `info` level.

use capture_core::controller::TickReport;
use capture_core::runner::TickCallback;
use tracing::{debug, info};

/// Agent ticks between heartbeat log lines.
const HEARTBEAT_TICKS: u64 = 500;

/// Callback counting ticks and degraded evaluations.
#[derive(Debug, Default)]
pub struct ProgressCallback {
    agent_ticks: u64,
    degraded: u64,
    reward: f32,
}

impl ProgressCallback {
    /// A callback with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Agent ticks seen since the last reset.
    pub const fn agent_ticks(&self) -> u64 {
        self.agent_ticks
    }

    /// Degraded ticks seen since the last reset.
    pub const fn degraded(&self) -> u64 {
        self.degraded
    }

    /// Clear the counters before the next episode.
    pub const fn reset(&mut self) {
        self.agent_ticks = 0;
        self.degraded = 0;
        self.reward = 0.0;
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, report: &TickReport) {
        self.agent_ticks = self.agent_ticks.saturating_add(1);
        self.reward += report.reward;
        if let Some(reason) = report.degraded {
            self.degraded = self.degraded.saturating_add(1);
            debug!(agent = %report.agent, tick = report.tick, %reason, "degraded tick");
        }
        if self.agent_ticks.checked_rem(HEARTBEAT_TICKS) == Some(0) {
            info!(
                agent_ticks = self.agent_ticks,
                degraded = self.degraded,
                tick_reward = self.reward,
                "Episode progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use capture_agents::SnapshotError;
    use capture_types::{AgentId, MotionIntent};

    use super::*;

    fn report(degraded: Option<SnapshotError>) -> TickReport {
        TickReport {
            agent: AgentId::new(),
            tick: 0,
            phase: None,
            intent: MotionIntent::hold(),
            rewards: Vec::new(),
            reward: 0.0,
            target: None,
            degraded,
        }
    }

    #[test]
    fn counts_ticks_and_degraded() {
        let mut cb = ProgressCallback::new();
        cb.on_tick(&report(None));
        cb.on_tick(&report(Some(SnapshotError::NoTargets)));
        assert_eq!(cb.agent_ticks(), 2);
        assert_eq!(cb.degraded(), 1);
        cb.reset();
        assert_eq!(cb.agent_ticks(), 0);
    }
}
