//! Turn-and-go heading controller.
//!
//! A stateless, single-step controller: if the destination is outside the
//! dead band the agent only turns, otherwise it only advances. Over several
//! ticks this produces an oscillate-then-advance gait that is good enough for
//! arena-scale navigation without a path planner.

use capture_types::geometry::signed_yaw;
use capture_types::{AgentState, ForwardAxis, MotionIntent, RotateAxis, Vec3};

/// One steering decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    /// Rotate counter-clockwise; the destination is to the left.
    TurnLeft,
    /// Rotate clockwise; the destination is to the right.
    TurnRight,
    /// The destination is ahead; move forward.
    Advance,
}

impl Steering {
    /// Overwrite the translation and rotation fields of `intent`.
    ///
    /// The laser field is left alone. A steering decision never leaves the
    /// intent both translating and rotating.
    pub const fn apply(self, intent: &mut MotionIntent) {
        match self {
            Self::TurnLeft => {
                intent.forward = ForwardAxis::Hold;
                intent.rotate = RotateAxis::Left;
            }
            Self::TurnRight => {
                intent.forward = ForwardAxis::Hold;
                intent.rotate = RotateAxis::Right;
            }
            Self::Advance => {
                intent.forward = ForwardAxis::Advance;
                intent.rotate = RotateAxis::Hold;
            }
        }
    }
}

/// Decide how to steer for a signed yaw in degrees.
///
/// `yaw < -dead_band` turns left, `yaw > dead_band` turns right and
/// everything in between (inclusive) advances.
pub fn steer(yaw: f32, dead_band: f32) -> Steering {
    if yaw < -dead_band {
        Steering::TurnLeft
    } else if yaw > dead_band {
        Steering::TurnRight
    } else {
        Steering::Advance
    }
}

/// Decide how `agent` should steer toward `destination`.
pub fn steer_toward(agent: &AgentState, destination: Vec3, dead_band: f32) -> Steering {
    steer(signed_yaw(agent.position, agent.yaw, destination), dead_band)
}
