//! Episode countdown clock.
//!
//! The clock is the single source of truth for how much of the episode is
//! left. It advances in fixed steps and never goes below zero. The decision
//! core only ever sees it through the [`EpisodeTimer`] trait, so tests can
//! substitute a fixed remaining time.

/// Read-only access to the remaining episode time.
pub trait EpisodeTimer {
    /// Remaining episode time in seconds, never negative.
    fn remaining(&self) -> f32;
}

/// Errors that can occur when creating or advancing the clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid clock parameters (e.g. zero duration).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// Step counter would overflow.
    #[error("step counter overflow: cannot advance beyond u64::MAX")]
    StepOverflow,
}

/// Fixed-step episode countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeClock {
    /// Episode length in seconds.
    duration: f32,

    /// Seconds per fixed step.
    step_seconds: f32,

    /// Remaining time in seconds.
    remaining: f32,

    /// Steps taken since the last reset.
    steps: u64,
}

impl EpisodeClock {
    /// Create a clock for an episode of `duration` seconds advanced in
    /// steps of `step_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if either value is not a
    /// positive finite number.
    pub fn new(duration: f32, step_seconds: f32) -> Result<Self, ClockError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!("episode duration must be positive, got {duration}"),
            });
        }
        if !step_seconds.is_finite() || step_seconds <= 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!("step length must be positive, got {step_seconds}"),
            });
        }
        Ok(Self {
            duration,
            step_seconds,
            remaining: duration,
            steps: 0,
        })
    }

    /// Advance one fixed step. Returns the remaining time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::StepOverflow`] if the step counter would
    /// exceed `u64::MAX`.
    pub fn advance(&mut self) -> Result<f32, ClockError> {
        self.steps = self.steps.checked_add(1).ok_or(ClockError::StepOverflow)?;
        self.remaining = (self.remaining - self.step_seconds).max(0.0);
        Ok(self.remaining)
    }

    /// Whether the episode has run out of time.
    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart the countdown from the full duration.
    pub const fn reset(&mut self) {
        self.remaining = self.duration;
        self.steps = 0;
    }

    /// Steps taken since the last reset.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Seconds per fixed step.
    pub const fn step_seconds(&self) -> f32 {
        self.step_seconds
    }

    /// Configured episode length.
    pub const fn duration(&self) -> f32 {
        self.duration
    }
}

impl EpisodeTimer for EpisodeClock {
    fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// A timer frozen at one remaining time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimer(pub f32);

impl EpisodeTimer for FixedTimer {
    fn remaining(&self) -> f32 {
        self.0.max(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_full() {
        let clock = EpisodeClock::new(120.0, 0.5).unwrap();
        assert!((clock.remaining() - 120.0).abs() < f32::EPSILON);
        assert_eq!(clock.steps(), 0);
        assert!(!clock.expired());
    }

    #[test]
    fn clock_counts_down_to_zero() {
        let mut clock = EpisodeClock::new(1.0, 0.4).unwrap();
        clock.advance().unwrap();
        clock.advance().unwrap();
        assert!(!clock.expired());
        let last = clock.advance().unwrap();
        assert!(last.abs() < f32::EPSILON);
        assert!(clock.expired());
        clock.advance().unwrap();
        assert!(clock.remaining() >= 0.0);
    }

    #[test]
    fn reset_restores_duration() {
        let mut clock = EpisodeClock::new(10.0, 1.0).unwrap();
        for _ in 0..4 {
            clock.advance().unwrap();
        }
        clock.reset();
        assert!((clock.remaining() - 10.0).abs() < f32::EPSILON);
        assert_eq!(clock.steps(), 0);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(EpisodeClock::new(0.0, 1.0).is_err());
        assert!(EpisodeClock::new(10.0, -1.0).is_err());
        assert!(EpisodeClock::new(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn fixed_timer_clamps_negative() {
        assert!(FixedTimer(-3.0).remaining().abs() < f32::EPSILON);
        assert!((FixedTimer(30.0).remaining() - 30.0).abs() < f32::EPSILON);
    }
}
