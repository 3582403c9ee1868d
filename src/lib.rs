//! Plane Fighter - a 2D arcade shooter as a reinforcement-learning environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, movement, collisions)
//! - `env`: Episode controller exposing the reset/step contract to a trainer
//! - `config`: Construction-time configuration and presets
//! - `error`: Configuration errors

pub mod config;
pub mod env;
pub mod error;
pub mod sim;

pub use config::{DifficultyConfig, EnvConfig, ObservationLayout, Preset, RewardWeights};
pub use env::{
    Action, ActionSpace, EpisodeStatus, Intent, Observation, RewardBreakdown, ShooterEnv,
    StepInfo, StepOutcome, VecEnv,
};
pub use error::ConfigError;

/// Default tunables (the Classic preset)
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Episode budget
    pub const MAX_STEPS: u32 = 5000;
    pub const INITIAL_LIVES: u32 = 3;

    /// Hero defaults
    pub const HERO_WIDTH: f32 = 50.0;
    pub const HERO_HEIGHT: f32 = 50.0;
    pub const MOVE_SPEED: f32 = 5.0;
    /// Steps between two hero shots
    pub const FIRE_COOLDOWN: u32 = 10;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 50.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_SPEED_MIN: f32 = 1.0;
    pub const ENEMY_SPEED_MAX: f32 = 3.0;
    pub const ENEMY_CAPACITY: usize = 5;
    pub const INITIAL_ENEMIES: usize = 1;
    /// Spawn band margin from the top and bottom edges
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Bullet defaults
    pub const HERO_BULLET_WIDTH: f32 = 6.0;
    pub const HERO_BULLET_HEIGHT: f32 = 14.0;
    pub const HERO_BULLET_SPEED: f32 = 10.0;
    pub const HERO_BULLET_CAPACITY: usize = 16;
    pub const ENEMY_BULLET_WIDTH: f32 = 8.0;
    pub const ENEMY_BULLET_HEIGHT: f32 = 8.0;
    pub const ENEMY_BULLET_SPEED: f32 = 6.0;
    pub const ENEMY_BULLET_CAPACITY: usize = 32;

    /// Per-step admission probabilities
    pub const ENEMY_SPAWN_PROB: f64 = 0.005;
    pub const ENEMY_FIRE_PROB: f64 = 0.01;

    /// Smallest denominator used by any normalization
    pub const MIN_DENOMINATOR: f32 = 1e-6;
}

/// Map a coordinate in `[0, extent]` to `[-1, 1]`.
///
/// Values outside the extent are clamped, and a degenerate extent maps to 0.
#[inline]
pub fn normalize_coord(value: f32, extent: f32) -> f32 {
    let extent = extent.max(consts::MIN_DENOMINATOR);
    clamp_unit(value / extent * 2.0 - 1.0)
}

/// Divide with a guarded denominator and clamp the result to `[-1, 1]`.
#[inline]
pub fn ratio(value: f32, denominator: f32) -> f32 {
    clamp_unit(value / denominator.max(consts::MIN_DENOMINATOR))
}

/// Clamp to `[-1, 1]`, mapping NaN to 0.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
