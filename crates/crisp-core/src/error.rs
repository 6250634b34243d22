//! Error types for setup, host calls, and scene configuration.

use thiserror::Error;

/// Fatal errors while building a [`Renderer`](crate::Renderer).
///
/// There is no degraded rendering mode, so callers abort on any of these.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no drawing surface with id `{0}`")]
    SurfaceNotFound(String),

    #[error("device scale factor must be a positive number, got {0}")]
    InvalidScaleFactor(f64),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// A failure reported by the host's drawing capability.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("could not acquire a 2D drawing context: {0}")]
    Context(String),

    #[error("could not allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },

    #[error("`{op}` failed: {reason}")]
    Draw { op: &'static str, reason: String },

    #[error("could not register event handler: {0}")]
    Event(String),
}

/// Invalid values in a [`SceneConfig`](crate::SceneConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid color `{0}` (expected #RGB or #RRGGBB)")]
    InvalidColor(String),

    #[error("`{field}` must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("malformed scene config: {0}")]
    Json(#[from] serde_json::Error),
}
