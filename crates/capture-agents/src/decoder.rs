//! Action vector decoding.
//!
//! Turns the positional integer codes produced by the learning collaborator
//! into a [`DecodedAction`]. Out-of-range codes decode as hold/off; the
//! decoder never fails.

use capture_types::actions::{
    FIRE_SLOT, FORWARD_SLOT, ROTATE_SLOT, SEEK_BASE_SLOT, SEEK_TARGET_SLOT,
};
use capture_types::{ActionVector, DecodedAction, ForwardAxis, MotionIntent, RotateAxis};
use tracing::trace;

/// Decode a raw action vector into typed per-axis intents.
pub fn decode(action: &ActionVector) -> DecodedAction {
    let decoded = DecodedAction {
        forward: ForwardAxis::from_code(action.slot(FORWARD_SLOT)),
        rotate: RotateAxis::from_code(action.slot(ROTATE_SLOT)),
        fire: action.slot(FIRE_SLOT) == 1,
        seek_target: action.slot(SEEK_TARGET_SLOT) == 1,
        seek_base: action.slot(SEEK_BASE_SLOT) == 1,
    };
    if decoded.forward.code() != action.slot(FORWARD_SLOT)
        || decoded.rotate.code() != action.slot(ROTATE_SLOT)
    {
        trace!(raw = ?action.0, "out-of-range motion code treated as hold");
    }
    decoded
}

/// The motion intent implied by the manual axes, before any navigation
/// override is applied.
pub const fn base_intent(decoded: &DecodedAction) -> MotionIntent {
    MotionIntent {
        forward: decoded.forward,
        rotate: decoded.rotate,
        laser: decoded.fire,
    }
}

/// Encode a decoded action back into raw codes.
pub const fn encode(decoded: &DecodedAction) -> ActionVector {
    ActionVector([
        decoded.forward.code(),
        decoded.rotate.code(),
        decoded.fire as i32,
        decoded.seek_target as i32,
        decoded.seek_base as i32,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_axis() {
        let decoded = decode(&ActionVector([1, 2, 1, 1, 0]));
        assert_eq!(decoded.forward, ForwardAxis::Advance);
        assert_eq!(decoded.rotate, RotateAxis::Left);
        assert!(decoded.fire);
        assert!(decoded.seek_target);
        assert!(!decoded.seek_base);
    }

    #[test]
    fn hold_vector_decodes_to_default() {
        assert_eq!(decode(&ActionVector::hold()), DecodedAction::default());
    }

    #[test]
    fn out_of_range_is_hold() {
        let decoded = decode(&ActionVector([9, -3, 2, 5, -1]));
        assert_eq!(decoded, DecodedAction::default());
    }

    #[test]
    fn base_intent_copies_manual_axes() {
        let decoded = decode(&ActionVector([2, 1, 1, 0, 0]));
        let intent = base_intent(&decoded);
        assert_eq!(intent.forward, ForwardAxis::Reverse);
        assert_eq!(intent.rotate, RotateAxis::Right);
        assert!(intent.laser);
    }

    #[test]
    fn encode_inverts_decode_for_valid_codes() {
        let raw = ActionVector([2, 1, 0, 1, 1]);
        assert_eq!(encode(&decode(&raw)), raw);
    }
}
