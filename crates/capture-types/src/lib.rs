//! Shared type definitions for the capture arena agent core.
//!
//! This crate is the single source of truth for the data that flows between
//! the external game layer and the decision-and-reward core: arena state,
//! action vectors, motion intents, contact events and observations.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for agents, collectibles and teams
//! - [`geometry`] -- Minimal 3-D vector math (distances, yaw angles, local frames)
//! - [`enums`] -- Enumeration types (episode phase, reward kinds, contact kinds)
//! - [`actions`] -- Discrete action vectors, per-axis decodings and motion intents
//! - [`structs`] -- Agents, collectibles, home bases and the world snapshot
//! - [`events`] -- Contact and combat events delivered by the game layer
//! - [`perception`] -- Observation vector handed to the learning collaborator

pub mod actions;
pub mod enums;
pub mod events;
pub mod geometry;
pub mod ids;
pub mod perception;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{ACTION_WIDTH, ActionVector, DecodedAction, ForwardAxis, MotionIntent, RotateAxis};
pub use enums::{ContactKind, Phase, RewardKind};
pub use events::{ArenaEvent, CombatEvent, ContactEvent, ContactReport};
pub use geometry::Vec3;
pub use ids::{AgentId, TargetId, TeamId};
pub use perception::Observation;
pub use structs::{AgentState, Collectible, HomeBase, WorldSnapshot};
