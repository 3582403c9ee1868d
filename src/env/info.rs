//! Per-step info records and episode statistics

use serde::{Deserialize, Serialize};

use super::reward::RewardBreakdown;
use crate::sim::{CollisionReport, DifficultyController, GameState, StepEvents};

/// Running performance counters for the current episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub kills: u32,
    pub shots_fired: u32,
    /// Hero bullets that destroyed an enemy
    pub shots_hit: u32,
    /// Lives lost
    pub damage_taken: u32,
    pub enemy_collisions: u32,
    pub bullet_hits: u32,
    pub enemies_spawned: u32,
    pub enemies_escaped: u32,
    /// Sum of step rewards
    pub total_reward: f32,
}

impl EpisodeStats {
    /// Fold one step into the counters
    pub fn record(
        &mut self,
        events: &StepEvents,
        collisions: &CollisionReport,
        spawned: u32,
        reward: f32,
    ) {
        self.kills += collisions.kills;
        self.shots_fired += u32::from(events.fired);
        self.shots_hit += collisions.bullets_spent;
        self.damage_taken += collisions.damage();
        self.enemy_collisions += collisions.enemy_collisions;
        self.bullet_hits += collisions.bullet_hits;
        self.enemies_spawned += spawned;
        self.enemies_escaped += events.enemies_escaped;
        self.total_reward += reward;
    }

    /// Fraction of shots that hit something
    pub fn accuracy(&self) -> f32 {
        self.shots_hit as f32 / self.shots_fired.max(1) as f32
    }

    /// Kill rate minus damage rate over `steps`, clamped to [0, 1]
    pub fn efficiency(&self, steps: u32) -> f32 {
        let steps = steps.max(1) as f32;
        let kill_rate = self.kills as f32 / steps;
        let damage_rate = self.damage_taken as f32 / steps;
        (kill_rate * 0.6 - damage_rate * 0.1).clamp(0.0, 1.0)
    }
}

/// Auxiliary information returned with every observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub score: u32,
    pub lives: u32,
    pub step_count: u32,
    /// Live enemies
    pub enemies: usize,
    /// Enemy bullets in flight
    pub bullets: usize,
    pub stats: EpisodeStats,
    /// Decomposition of the last step's reward
    pub reward: RewardBreakdown,
    /// Current difficulty level, when a controller is active
    pub difficulty: Option<f32>,
    /// Observation that ended the episode, set by `VecEnv` on auto-reset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_observation: Option<Vec<f32>>,
}

impl StepInfo {
    pub fn from_state(
        state: &GameState,
        stats: &EpisodeStats,
        reward: RewardBreakdown,
        difficulty: Option<&DifficultyController>,
    ) -> Self {
        Self {
            score: state.hero.score,
            lives: state.hero.lives,
            step_count: state.step_count,
            enemies: state.enemies.len(),
            bullets: state.enemy_bullets.len(),
            stats: *stats,
            reward,
            difficulty: difficulty.map(|d| d.difficulty),
            final_observation: None,
        }
    }
}
