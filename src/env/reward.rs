//! Reward shaping
//!
//! The step reward is a plain sum of independently weighted terms. Each term is
//! kept separately so trainers and tests can inspect the decomposition.

use serde::{Deserialize, Serialize};

use crate::config::{EnvConfig, RewardWeights};
use crate::sim::{Body, CollisionReport, GameState, StepEvents};

/// Per-term contributions for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub survival: f32,
    pub kill: f32,
    pub enemy_collision: f32,
    pub bullet_collision: f32,
    pub safe_zone: f32,
    pub attack_range: f32,
    pub fire: f32,
    pub reloading: f32,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.survival
            + self.kill
            + self.enemy_collision
            + self.bullet_collision
            + self.safe_zone
            + self.attack_range
            + self.fire
            + self.reloading
    }

    /// Collision penalties only
    pub fn penalties(&self) -> f32 {
        self.enemy_collision + self.bullet_collision
    }
}

/// Score one step
///
/// `alive_before` is the hero's status when the step began; a hero that was
/// already dead earns nothing. Everything else reads the post-step state.
pub fn compute_reward(
    alive_before: bool,
    after: &GameState,
    collisions: &CollisionReport,
    events: &StepEvents,
    config: &EnvConfig,
) -> RewardBreakdown {
    if !alive_before {
        return RewardBreakdown::default();
    }
    let weights: &RewardWeights = &config.rewards;
    let hero = &after.hero;

    let in_range = after
        .nearest_enemy()
        .is_some_and(|(dist_sq, _)| dist_sq < weights.attack_range_px * weights.attack_range_px);

    RewardBreakdown {
        survival: if hero.is_alive() { weights.survival } else { 0.0 },
        kill: collisions.kills as f32 * weights.kill,
        enemy_collision: collisions.enemy_collisions as f32 * weights.enemy_collision,
        bullet_collision: collisions.bullet_hits as f32 * weights.bullet_collision,
        safe_zone: if hero.center().x < config.screen_width / 3.0 {
            weights.safe_zone
        } else {
            0.0
        },
        attack_range: if in_range { weights.attack_range } else { 0.0 },
        fire: if events.fired { weights.fire } else { 0.0 },
        reloading: if hero.cooldown > 0 { weights.reloading } else { 0.0 },
    }
}
