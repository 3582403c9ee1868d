//! Configuration errors
//!
//! The only fallible operations in this crate happen at construction time.
//! Once an environment exists, `reset` and `step` are total.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration that cannot produce a valid environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("screen dimensions must be positive and finite, got {width}x{height}")]
    InvalidScreen { width: f32, height: f32 },

    #[error("{name} box {width}x{height} must be positive and fit inside the screen")]
    InvalidBox {
        name: &'static str,
        width: f32,
        height: f32,
    },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("enemy speed range [{min}, {max}] is empty or negative")]
    InvalidSpeedRange { min: f32, max: f32 },

    #[error("reward weight `{name}` must be finite, got {value}")]
    NonFiniteWeight { name: &'static str, value: f32 },

    #[error("max_steps must be at least 1")]
    ZeroMaxSteps,

    #[error("initial_lives must be at least 1")]
    ZeroLives,

    #[error("initial_enemies ({initial}) exceeds enemy_capacity ({capacity})")]
    InitialEnemiesOverCapacity { initial: usize, capacity: usize },

    #[error("difficulty: {0}")]
    Difficulty(String),

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
