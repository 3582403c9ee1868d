//! Environment configuration and presets
//!
//! Everything here is fixed at construction time. A trained policy is only
//! valid for the action space and observation layout it was trained with, so
//! presets pin those down by name.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::env::ActionSpace;
use crate::error::ConfigError;

/// Named environment variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Standalone environment: 9 discrete actions, 22-float observation
    #[default]
    Classic,
    /// More enemies and observation slots: 40-float observation
    Extended,
    /// Dynamic difficulty with multi-discrete actions: 25-float observation
    Integrated,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Extended => "Extended",
            Preset::Integrated => "Integrated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "standalone" => Some(Preset::Classic),
            "extended" => Some(Preset::Extended),
            "integrated" => Some(Preset::Integrated),
            _ => None,
        }
    }

    pub fn all() -> [Preset; 3] {
        [Preset::Classic, Preset::Extended, Preset::Integrated]
    }
}

/// Additive reward term weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Per step while alive
    pub survival: f32,
    /// Per enemy destroyed by a hero bullet
    pub kill: f32,
    /// Per hero-enemy collision (negative)
    pub enemy_collision: f32,
    /// Per hero-enemy-bullet collision (negative)
    pub bullet_collision: f32,
    /// Hero centre inside the safe third of the screen
    pub safe_zone: f32,
    /// Nearest enemy within `attack_range_px`
    pub attack_range: f32,
    /// A shot was emitted this step
    pub fire: f32,
    /// Weapon still cooling down after the step
    pub reloading: f32,
    /// Distance threshold for the attack-range term (pixels)
    pub attack_range_px: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            survival: 0.1,
            kill: 50.0,
            enemy_collision: -2.0,
            bullet_collision: -1.0,
            safe_zone: 0.02,
            attack_range: 0.05,
            fire: 0.1,
            reloading: 0.01,
            attack_range_px: 200.0,
        }
    }
}

impl RewardWeights {
    fn named(&self) -> [(&'static str, f32); 9] {
        [
            ("survival", self.survival),
            ("kill", self.kill),
            ("enemy_collision", self.enemy_collision),
            ("bullet_collision", self.bullet_collision),
            ("safe_zone", self.safe_zone),
            ("attack_range", self.attack_range),
            ("fire", self.fire),
            ("reloading", self.reloading),
            ("attack_range_px", self.attack_range_px),
        ]
    }
}

/// Fixed slot partitioning of the observation vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationLayout {
    /// Nearest enemies encoded (x, y, speed, present)
    pub enemy_slots: usize,
    /// Nearest enemy bullets encoded (x, y, present)
    pub bullet_slots: usize,
    /// Score that maps to 1.0
    pub score_scale: f32,
    /// Append difficulty, spawn and fire rate scalars
    pub include_difficulty: bool,
}

impl Default for ObservationLayout {
    fn default() -> Self {
        Self {
            enemy_slots: 2,
            bullet_slots: 2,
            score_scale: 100.0,
            include_difficulty: false,
        }
    }
}

impl ObservationLayout {
    pub const HERO_WIDTH: usize = 4;
    pub const ENEMY_WIDTH: usize = 4;
    pub const BULLET_WIDTH: usize = 3;
    pub const SCALAR_WIDTH: usize = 4;
    pub const DIFFICULTY_WIDTH: usize = 3;

    /// Offset of the first enemy slot
    pub fn enemy_offset(&self) -> usize {
        Self::HERO_WIDTH
    }

    /// Offset of the first bullet slot
    pub fn bullet_offset(&self) -> usize {
        self.enemy_offset() + self.enemy_slots * Self::ENEMY_WIDTH
    }

    /// Offset of the scalar block
    pub fn scalar_offset(&self) -> usize {
        self.bullet_offset() + self.bullet_slots * Self::BULLET_WIDTH
    }

    /// Offset of the difficulty block (only meaningful when included)
    pub fn difficulty_offset(&self) -> usize {
        self.scalar_offset() + Self::SCALAR_WIDTH
    }

    /// Total observation length K
    pub fn size(&self) -> usize {
        let base = self.difficulty_offset();
        if self.include_difficulty {
            base + Self::DIFFICULTY_WIDTH
        } else {
            base
        }
    }
}

/// Dynamic difficulty controller settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Steps between adjustments
    pub interval: u32,
    pub initial_difficulty: f32,
    pub spawn_prob: f64,
    pub fire_prob: f64,
    pub difficulty_step: f32,
    pub spawn_step: f64,
    pub fire_step: f64,
    pub spawn_cap: f64,
    pub fire_cap: f64,
    /// Efficiency above which the game gets harder
    pub raise_above: f32,
    /// Efficiency below which the game gets easier
    pub lower_below: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            interval: 100,
            initial_difficulty: 0.5,
            spawn_prob: 0.02,
            fire_prob: 0.01,
            difficulty_step: 0.05,
            spawn_step: 0.001,
            fire_step: 0.0005,
            spawn_cap: 0.1,
            fire_cap: 0.05,
            raise_above: 0.7,
            lower_below: 0.3,
        }
    }
}

impl DifficultyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::Difficulty("interval must be at least 1".into()));
        }
        for (name, value) in [
            ("spawn_prob", self.spawn_prob),
            ("fire_prob", self.fire_prob),
            ("spawn_cap", self.spawn_cap),
            ("fire_cap", self.fire_cap),
        ] {
            check_probability(name, value)?;
        }
        if self.spawn_prob > self.spawn_cap || self.fire_prob > self.fire_cap {
            return Err(ConfigError::Difficulty(
                "initial probabilities must not exceed their caps".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_difficulty) {
            return Err(ConfigError::Difficulty(format!(
                "initial_difficulty must be in [0, 1], got {}",
                self.initial_difficulty
            )));
        }
        if self.lower_below > self.raise_above {
            return Err(ConfigError::Difficulty(format!(
                "lower_below ({}) must not exceed raise_above ({})",
                self.lower_below, self.raise_above
            )));
        }
        let steps = [self.spawn_step, self.fire_step, self.difficulty_step as f64];
        if steps.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(ConfigError::Difficulty("steps must be finite and non-negative".into()));
        }
        Ok(())
    }
}

/// Complete environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub preset: Preset,

    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub max_steps: u32,

    // === Hero ===
    pub initial_lives: u32,
    pub hero_size: Vec2,
    pub move_speed: f32,
    pub fire_cooldown: u32,
    pub hero_bullet_size: Vec2,
    pub hero_bullet_speed: f32,
    pub hero_bullet_capacity: usize,

    // === Enemies ===
    pub enemy_size: Vec2,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    pub enemy_capacity: usize,
    pub initial_enemies: usize,
    pub enemy_spawn_prob: f64,
    pub enemy_fire_prob: f64,
    pub enemy_bullet_size: Vec2,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_capacity: usize,

    // === MDP surface ===
    pub action_space: ActionSpace,
    pub observation: ObservationLayout,
    pub rewards: RewardWeights,
    pub difficulty: Option<DifficultyConfig>,

    /// Master seed used when `reset` is called without one
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            preset: Preset::Classic,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            max_steps: MAX_STEPS,

            initial_lives: INITIAL_LIVES,
            hero_size: Vec2::new(HERO_WIDTH, HERO_HEIGHT),
            move_speed: MOVE_SPEED,
            fire_cooldown: FIRE_COOLDOWN,
            hero_bullet_size: Vec2::new(HERO_BULLET_WIDTH, HERO_BULLET_HEIGHT),
            hero_bullet_speed: HERO_BULLET_SPEED,
            hero_bullet_capacity: HERO_BULLET_CAPACITY,

            enemy_size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            enemy_speed_min: ENEMY_SPEED_MIN,
            enemy_speed_max: ENEMY_SPEED_MAX,
            enemy_capacity: ENEMY_CAPACITY,
            initial_enemies: INITIAL_ENEMIES,
            enemy_spawn_prob: ENEMY_SPAWN_PROB,
            enemy_fire_prob: ENEMY_FIRE_PROB,
            enemy_bullet_size: Vec2::new(ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT),
            enemy_bullet_speed: ENEMY_BULLET_SPEED,
            enemy_bullet_capacity: ENEMY_BULLET_CAPACITY,

            action_space: ActionSpace::Discrete9,
            observation: ObservationLayout::default(),
            rewards: RewardWeights::default(),
            difficulty: None,

            seed: 0,
        }
    }
}

impl EnvConfig {
    /// Create a config from a preset (applies preset defaults)
    pub fn from_preset(preset: Preset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a preset (updates the preset-dependent fields only)
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        match preset {
            Preset::Classic => {
                self.action_space = ActionSpace::Discrete9;
                self.enemy_capacity = ENEMY_CAPACITY;
                self.observation = ObservationLayout::default();
                self.difficulty = None;
            }
            Preset::Extended => {
                self.action_space = ActionSpace::Discrete9;
                self.enemy_capacity = 8;
                self.enemy_spawn_prob = 0.01;
                self.observation = ObservationLayout {
                    enemy_slots: 5,
                    bullet_slots: 4,
                    ..ObservationLayout::default()
                };
                self.difficulty = None;
            }
            Preset::Integrated => {
                self.action_space = ActionSpace::MultiDiscrete332;
                self.enemy_capacity = 8;
                self.move_speed = 3.0;
                self.observation = ObservationLayout {
                    include_difficulty: true,
                    ..ObservationLayout::default()
                };
                self.difficulty = Some(DifficultyConfig::default());
            }
        }
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded {} config from {}", config.preset.as_str(), path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Observation length K for this configuration
    pub fn observation_size(&self) -> usize {
        self.observation.size()
    }

    /// Playfield extents as a vector
    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Hero spawn point: left sixth of the screen, vertically centred
    pub fn hero_spawn(&self) -> Vec2 {
        Vec2::new(self.screen_width / 6.0, self.screen_height / 2.0)
    }

    /// Check every construction-time invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width.is_finite() && self.screen_height.is_finite())
            || self.screen_width <= 0.0
            || self.screen_height <= 0.0
        {
            return Err(ConfigError::InvalidScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }

        for (name, size) in [
            ("hero", self.hero_size),
            ("enemy", self.enemy_size),
            ("hero bullet", self.hero_bullet_size),
            ("enemy bullet", self.enemy_bullet_size),
        ] {
            let fits = size.x > 0.0
                && size.y > 0.0
                && size.x <= self.screen_width
                && size.y <= self.screen_height;
            if !fits {
                return Err(ConfigError::InvalidBox {
                    name,
                    width: size.x,
                    height: size.y,
                });
            }
        }

        for (name, value) in [
            ("move_speed", self.move_speed),
            ("hero_bullet_speed", self.hero_bullet_speed),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("observation.score_scale", self.observation.score_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if !(self.enemy_speed_min.is_finite() && self.enemy_speed_max.is_finite())
            || self.enemy_speed_min < 0.0
            || self.enemy_speed_min > self.enemy_speed_max
        {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.enemy_speed_min,
                max: self.enemy_speed_max,
            });
        }

        check_probability("enemy_spawn_prob", self.enemy_spawn_prob)?;
        check_probability("enemy_fire_prob", self.enemy_fire_prob)?;

        if self.initial_enemies > self.enemy_capacity {
            return Err(ConfigError::InitialEnemiesOverCapacity {
                initial: self.initial_enemies,
                capacity: self.enemy_capacity,
            });
        }

        for (name, value) in self.rewards.named() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteWeight { name, value });
            }
        }

        match &self.difficulty {
            Some(difficulty) => difficulty.validate()?,
            None if self.observation.include_difficulty => {
                return Err(ConfigError::Difficulty(
                    "observation includes difficulty but no controller is configured".into(),
                ));
            }
            None => {}
        }

        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}
