//! Action source trait and the built-in sources.
//!
//! Each decision tick the runner presents every agent's [`Observation`] to an
//! [`ActionSource`] and receives an [`ActionVector`] in response. The trait
//! abstracts how that vector is produced: a trained network behind an FFI or
//! socket, a scripted bot, a human at the keyboard, or a test stub.
//!
//! A failing source never stops the episode. The runner logs the error and
//! substitutes [`ActionVector::hold`], so the agent still follows the
//! policy's own navigation directives.

use std::collections::BTreeSet;

use capture_agents::encode;
use capture_types::{
    ACTION_WIDTH, ActionVector, AgentId, DecodedAction, ForwardAxis, Observation, RotateAxis,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Errors an action source can report.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// An internal error in the action source.
    #[error("action source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of action vectors.
pub trait ActionSource {
    /// Choose the action vector for `agent` given its observation.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] if no action can be produced. The caller
    /// substitutes a hold vector.
    fn choose(
        &mut self,
        agent: AgentId,
        observation: &Observation,
    ) -> Result<ActionVector, DecisionError>;
}

// ---------------------------------------------------------------------------
// StubActionSource
// ---------------------------------------------------------------------------

/// A source that always returns [`ActionVector::hold`].
///
/// With this source the agent is driven purely by the reward policy's
/// navigation directives.
#[derive(Debug, Clone, Default)]
pub struct StubActionSource;

impl StubActionSource {
    /// Create a new stub action source.
    pub const fn new() -> Self {
        Self
    }
}

impl ActionSource for StubActionSource {
    fn choose(
        &mut self,
        _agent: AgentId,
        _observation: &Observation,
    ) -> Result<ActionVector, DecisionError> {
        Ok(ActionVector::hold())
    }
}

// ---------------------------------------------------------------------------
// RandomActionSource
// ---------------------------------------------------------------------------

/// Branch sizes of the discrete action space, in slot order.
pub const BRANCH_SIZES: [i32; ACTION_WIDTH] = [3, 3, 2, 2, 2];

/// A source drawing every slot uniformly from its branch.
#[derive(Debug, Clone)]
pub struct RandomActionSource {
    rng: StdRng,
}

impl RandomActionSource {
    /// Create a seeded random source.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ActionSource for RandomActionSource {
    fn choose(
        &mut self,
        _agent: AgentId,
        _observation: &Observation,
    ) -> Result<ActionVector, DecisionError> {
        let mut action = ActionVector::hold();
        for (slot, size) in BRANCH_SIZES.into_iter().enumerate() {
            action.set(slot, self.rng.random_range(0..size));
        }
        Ok(action)
    }
}

// ---------------------------------------------------------------------------
// ManualActionSource
// ---------------------------------------------------------------------------

/// Keys recognised by the manual source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlKey {
    /// Forward.
    Up,
    /// Reverse.
    Down,
    /// Turn right.
    Right,
    /// Turn left.
    Left,
    /// Fire the laser.
    Space,
    /// Seek the nearest target.
    A,
    /// Seek the home base.
    H,
}

/// A source reading the currently held keys.
///
/// When opposing keys are both held, `Down` wins over `Up` and `Left` wins
/// over `Right`.
#[derive(Debug, Clone, Default)]
pub struct ManualActionSource {
    held: BTreeSet<ControlKey>,
}

impl ManualActionSource {
    /// A source with no keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as held.
    pub fn press(&mut self, key: ControlKey) {
        self.held.insert(key);
    }

    /// Mark a key as released.
    pub fn release(&mut self, key: ControlKey) {
        self.held.remove(&key);
    }

    /// Release every key.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn is_held(&self, key: ControlKey) -> bool {
        self.held.contains(&key)
    }

    /// The action vector for the keys currently held.
    pub fn current(&self) -> ActionVector {
        let forward = if self.is_held(ControlKey::Down) {
            ForwardAxis::Reverse
        } else if self.is_held(ControlKey::Up) {
            ForwardAxis::Advance
        } else {
            ForwardAxis::Hold
        };
        let rotate = if self.is_held(ControlKey::Left) {
            RotateAxis::Left
        } else if self.is_held(ControlKey::Right) {
            RotateAxis::Right
        } else {
            RotateAxis::Hold
        };
        encode(&DecodedAction {
            forward,
            rotate,
            fire: self.is_held(ControlKey::Space),
            seek_target: self.is_held(ControlKey::A),
            seek_base: self.is_held(ControlKey::H),
        })
    }
}

impl ActionSource for ManualActionSource {
    fn choose(
        &mut self,
        _agent: AgentId,
        _observation: &Observation,
    ) -> Result<ActionVector, DecisionError> {
        Ok(self.current())
    }
}
