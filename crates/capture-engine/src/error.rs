//! Error types for the sandbox engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and episode execution.

/// Top-level error for the sandbox engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: capture_core::config::ConfigError,
    },

    /// Episode clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: capture_core::clock::ClockError,
    },

    /// Episode runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: capture_core::runner::RunnerError,
    },

    /// Episode summary could not be serialized.
    #[error("summary serialization failed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The arena layout could not be built.
    #[error("arena error: {message}")]
    Arena {
        /// Description of the layout failure.
        message: String,
    },
}
