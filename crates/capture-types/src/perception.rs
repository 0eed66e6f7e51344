//! Observation vector delivered to the learning collaborator each tick.
//!
//! The layout is fixed:
//!
//! ```text
//! [localVel.x, localVel.z, timeRemaining, rotation.y,
//!  pos.x, pos.y, pos.z, baseLoc.x, baseLoc.y, baseLoc.z,
//!  {target.x, target.y, target.z, target.carried, target.inBase} x N,
//!  isFrozen]
//! ```

use serde::{Deserialize, Serialize};

/// Values before the per-target block.
pub const HEADER_LEN: usize = 10;

/// Values per target slot.
pub const TARGET_STRIDE: usize = 5;

/// Values after the per-target block.
pub const TRAILER_LEN: usize = 1;

/// A flat observation vector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    /// The observation values in layout order.
    pub values: Vec<f32>,
}

impl Observation {
    /// Expected observation length for an arena with `target_slots` slots.
    pub const fn expected_len(target_slots: usize) -> usize {
        HEADER_LEN
            .saturating_add(target_slots.saturating_mul(TARGET_STRIDE))
            .saturating_add(TRAILER_LEN)
    }

    /// An all-zero observation of the right length.
    pub fn zeroed(target_slots: usize) -> Self {
        Self {
            values: vec![0.0; Self::expected_len(target_slots)],
        }
    }

    /// Number of values.
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the observation has no values.
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The trailing frozen flag, if present.
    pub fn frozen_flag(&self) -> Option<f32> {
        self.values.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_len_grows_by_stride() {
        assert_eq!(Observation::expected_len(0), 11);
        assert_eq!(Observation::expected_len(4), 31);
    }

    #[test]
    fn zeroed_matches_expected_len() {
        let obs = Observation::zeroed(3);
        assert_eq!(obs.len(), Observation::expected_len(3));
        assert_eq!(obs.frozen_flag(), Some(0.0));
    }
}
