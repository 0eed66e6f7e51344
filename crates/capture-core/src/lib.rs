//! Agent controller, episode clock, configuration and episode runner for the
//! capture arena.
//!
//! This crate wires the pure decision logic of `capture-agents` to the
//! outside world: it builds observations, talks to action sources, drives
//! physics through a sink trait and runs whole episodes.
//!
//! # Modules
//!
//! - [`clock`] -- Fixed-step episode countdown and the [`EpisodeTimer`] trait.
//! - [`config`] -- Configuration loading from `capture-config.yaml` into
//!   strongly-typed structs.
//! - [`controller`] -- [`AgentController`] plus the physics and world
//!   collaborator traits.
//! - [`decision`] -- [`ActionSource`] trait with stub, random and manual
//!   sources.
//! - [`perception`] -- Observation vector assembly.
//! - [`runner`] -- The episode loop and its summary.
//!
//! [`EpisodeTimer`]: clock::EpisodeTimer
//! [`AgentController`]: controller::AgentController
//! [`ActionSource`]: decision::ActionSource

pub mod clock;
pub mod config;
pub mod controller;
pub mod decision;
pub mod perception;
pub mod runner;
