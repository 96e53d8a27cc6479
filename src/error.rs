//! Error types
//!
//! Configuration problems are rejected at construction time. Nothing inside a
//! tick can fail, so the simulation itself has no error type.

use thiserror::Error;

use crate::sim::Rect;

/// Invalid level geometry, settings or level files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level has no platforms")]
    NoPlatforms,

    #[error("platform {index} is degenerate: {rect:?}")]
    DegeneratePlatform { index: usize, rect: Rect },

    #[error("exit rectangle is degenerate: {rect:?}")]
    DegenerateExit { rect: Rect },

    #[error("{what} must be positive and finite, got {value}")]
    NonPositive { what: &'static str, value: f32 },

    #[error("{what} must be zero or more and finite, got {value}")]
    Negative { what: &'static str, value: f32 },

    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f32 },

    #[error("{what} range {min}..={max} is empty or unbounded")]
    EmptyRange { what: &'static str, min: f32, max: f32 },

    #[error("level set is empty")]
    NoLevels,

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Check that a size, speed or distance is usable
    pub(crate) fn positive(what: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::NonPositive { what, value })
        }
    }

    /// Check a distance or tolerance where zero is allowed
    pub(crate) fn non_negative(what: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::Negative { what, value })
        }
    }

    pub(crate) fn finite(what: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { what, value })
        }
    }
}

/// Game loop lifecycle failures
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("game loop is already running")]
    AlreadyRunning,

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("game loop thread panicked")]
    Panicked,
}
