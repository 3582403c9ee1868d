//! Dynamic difficulty
//!
//! Periodically nudges the spawn and enemy fire probabilities based on how
//! efficiently the agent is playing. Used by the Integrated preset.

use serde::{Deserialize, Serialize};

use crate::config::DifficultyConfig;

/// Direction of the last adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    Harder,
    Easier,
}

/// Current difficulty parameters for one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyController {
    config: DifficultyConfig,
    /// Abstract difficulty level in [0, 1]
    pub difficulty: f32,
    /// Effective per-step enemy spawn probability
    pub spawn_prob: f64,
    /// Effective per-step, per-enemy fire probability
    pub fire_prob: f64,
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            config,
            difficulty: config.initial_difficulty,
            spawn_prob: config.spawn_prob,
            fire_prob: config.fire_prob,
        }
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Back to the initial parameters
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Check `efficiency` on interval boundaries and adjust
    pub fn update(&mut self, step: u32, efficiency: f32) -> Option<Adjustment> {
        if step == 0 || self.config.interval == 0 || step % self.config.interval != 0 {
            return None;
        }

        let adjustment = if efficiency > self.config.raise_above {
            self.difficulty = (self.difficulty + self.config.difficulty_step).min(1.0);
            self.spawn_prob = (self.spawn_prob + self.config.spawn_step).min(self.config.spawn_cap);
            self.fire_prob = (self.fire_prob + self.config.fire_step).min(self.config.fire_cap);
            Adjustment::Harder
        } else if efficiency < self.config.lower_below {
            self.difficulty = (self.difficulty - self.config.difficulty_step).max(0.0);
            self.spawn_prob = (self.spawn_prob - self.config.spawn_step).max(0.0);
            self.fire_prob = (self.fire_prob - self.config.fire_step).max(0.0);
            Adjustment::Easier
        } else {
            return None;
        };

        log::debug!(
            "step {}: efficiency {:.3} -> {:?} (difficulty {:.2}, spawn {:.4}, fire {:.4})",
            step,
            efficiency,
            adjustment,
            self.difficulty,
            self.spawn_prob,
            self.fire_prob
        );
        Some(adjustment)
    }

    /// Spawn probability relative to its cap
    pub fn spawn_level(&self) -> f32 {
        crate::ratio(self.spawn_prob as f32, self.config.spawn_cap as f32)
    }

    /// Fire probability relative to its cap
    pub fn fire_level(&self) -> f32 {
        crate::ratio(self.fire_prob as f32, self.config.fire_cap as f32)
    }
}
