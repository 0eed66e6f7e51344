//! Discrete action vectors and the motion intents they produce.
//!
//! The learning collaborator speaks in positional integer codes; everything
//! past the decoder works with the tagged per-axis enums defined here.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// Number of slots in an [`ActionVector`].
pub const ACTION_WIDTH: usize = 5;

/// Slot index of the forward axis.
pub const FORWARD_SLOT: usize = 0;
/// Slot index of the rotate axis.
pub const ROTATE_SLOT: usize = 1;
/// Slot index of the fire axis.
pub const FIRE_SLOT: usize = 2;
/// Slot index of the seek-target axis.
pub const SEEK_TARGET_SLOT: usize = 3;
/// Slot index of the seek-base axis.
pub const SEEK_BASE_SLOT: usize = 4;

// ---------------------------------------------------------------------------
// ActionVector
// ---------------------------------------------------------------------------

/// A raw 5-slot discrete action vector:
/// `[forward, rotate, fire, seek_target, seek_base]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionVector(pub [i32; ACTION_WIDTH]);

impl ActionVector {
    /// The all-zero vector: hold position, weapon off, no navigation.
    pub const fn hold() -> Self {
        Self([0; ACTION_WIDTH])
    }

    /// Build a vector from an arbitrary slice. Missing slots are zero and
    /// extra slots are ignored.
    pub fn from_slice(raw: &[i32]) -> Self {
        let mut slots = [0; ACTION_WIDTH];
        for (slot, value) in slots.iter_mut().zip(raw) {
            *slot = *value;
        }
        Self(slots)
    }

    /// Read one slot, returning `0` for an index past the end.
    pub fn slot(&self, index: usize) -> i32 {
        self.0.get(index).copied().unwrap_or(0)
    }

    /// Overwrite one slot. Indices past the end are ignored.
    pub fn set(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }
}

// ---------------------------------------------------------------------------
// Per-axis enums
// ---------------------------------------------------------------------------

/// Forward axis of the action vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardAxis {
    /// Code 0: no translation.
    #[default]
    Hold,
    /// Code 1: move along the agent's forward vector.
    Advance,
    /// Code 2: move against the agent's forward vector.
    Reverse,
}

impl ForwardAxis {
    /// Decode a raw code. Anything outside `0..=2` is treated as hold.
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Advance,
            2 => Self::Reverse,
            _ => Self::Hold,
        }
    }

    /// Encode back into the raw code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Hold => 0,
            Self::Advance => 1,
            Self::Reverse => 2,
        }
    }
}

/// Rotate axis of the action vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateAxis {
    /// Code 0: no rotation.
    #[default]
    Hold,
    /// Code 1: turn clockwise (to the right) about the up axis.
    Right,
    /// Code 2: turn counter-clockwise (to the left) about the up axis.
    Left,
}

impl RotateAxis {
    /// Decode a raw code. Anything outside `0..=2` is treated as hold.
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Right,
            2 => Self::Left,
            _ => Self::Hold,
        }
    }

    /// Encode back into the raw code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Hold => 0,
            Self::Right => 1,
            Self::Left => 2,
        }
    }
}

/// A fully decoded action vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodedAction {
    /// Translation request.
    pub forward: ForwardAxis,
    /// Rotation request.
    pub rotate: RotateAxis,
    /// Weapon level for this tick.
    pub fire: bool,
    /// Navigate toward the nearest free target this tick.
    pub seek_target: bool,
    /// Navigate toward the home base this tick.
    pub seek_base: bool,
}

// ---------------------------------------------------------------------------
// MotionIntent
// ---------------------------------------------------------------------------

/// The command handed to the physics collaborator for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionIntent {
    /// Translation along the agent's forward vector.
    pub forward: ForwardAxis,
    /// Rotation about the up axis.
    pub rotate: RotateAxis,
    /// Whether the laser is on.
    pub laser: bool,
}

impl MotionIntent {
    /// No translation, no rotation, weapon off.
    pub const fn hold() -> Self {
        Self {
            forward: ForwardAxis::Hold,
            rotate: RotateAxis::Hold,
            laser: false,
        }
    }

    /// World-space direction to travel for an agent with the given yaw.
    pub fn direction(&self, yaw_degrees: f32) -> Vec3 {
        match self.forward {
            ForwardAxis::Hold => Vec3::ZERO,
            ForwardAxis::Advance => Vec3::forward(yaw_degrees),
            ForwardAxis::Reverse => Vec3::forward(yaw_degrees).scaled(-1.0),
        }
    }

    /// Rotation axis; positive `y` turns right.
    pub const fn rotation(&self) -> Vec3 {
        match self.rotate {
            RotateAxis::Hold => Vec3::ZERO,
            RotateAxis::Right => Vec3::UP,
            RotateAxis::Left => Vec3::new(0.0, -1.0, 0.0),
        }
    }

    /// Whether the intent both translates and rotates.
    pub const fn moves_and_rotates(&self) -> bool {
        !matches!(self.forward, ForwardAxis::Hold) && !matches!(self.rotate, RotateAxis::Hold)
    }
}
