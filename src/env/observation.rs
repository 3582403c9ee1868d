//! Observation encoder
//!
//! Flat vector with fixed slots, every component clamped to [-1, 1]:
//! - hero: x, y, heading x, heading y
//! - N enemy slots: x, y, speed / max speed, present
//! - M enemy bullet slots: x, y, present
//! - scalars: score, lives fraction, elapsed fraction, cooldown fraction
//! - optional difficulty: level, spawn rate / cap, fire rate / cap
//!
//! Slots are filled nearest-first (squared distance to the hero centre, ties
//! to the lower entity id). Empty slots are all zeros.

use std::ops::Deref;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{EnvConfig, ObservationLayout};
use crate::sim::{Body, DifficultyController, GameState};
use crate::{clamp_unit, normalize_coord, ratio};

/// Fixed-length normalized state encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation(pub Vec<f32>);

impl Observation {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }

    /// True when every component lies in [-1, 1]
    pub fn in_bounds(&self) -> bool {
        self.0.iter().all(|v| (-1.0..=1.0).contains(v))
    }
}

impl Deref for Observation {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

/// Indices of the `slots` bodies nearest to `origin`
fn nearest<B: Body>(
    bodies: &[B],
    ids: impl Fn(&B) -> u32,
    origin: Vec2,
    slots: usize,
) -> Vec<usize> {
    let mut order: Vec<(f32, u32, usize)> = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| (body.center().distance_squared(origin), ids(body), i))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    order.into_iter().take(slots).map(|(_, _, i)| i).collect()
}

/// Encode the current state
pub fn encode(
    state: &GameState,
    config: &EnvConfig,
    difficulty: Option<&DifficultyController>,
) -> Observation {
    let layout: &ObservationLayout = &config.observation;
    let mut data = vec![0.0f32; layout.size()];
    let (width, height) = (config.screen_width, config.screen_height);
    let hero = &state.hero;

    // HERO [0..4)
    data[0] = normalize_coord(hero.pos.x, width);
    data[1] = normalize_coord(hero.pos.y, height);
    data[2] = clamp_unit(hero.heading.x);
    data[3] = clamp_unit(hero.heading.y);

    // ENEMIES
    let origin = hero.center();
    let enemies = nearest(state.enemies.as_slice(), |e| e.id, origin, layout.enemy_slots);
    for (slot, &i) in enemies.iter().enumerate() {
        let enemy = &state.enemies[i];
        let base = layout.enemy_offset() + slot * ObservationLayout::ENEMY_WIDTH;
        data[base] = normalize_coord(enemy.pos.x, width);
        data[base + 1] = normalize_coord(enemy.pos.y, height);
        data[base + 2] = ratio(enemy.speed, config.enemy_speed_max);
        data[base + 3] = 1.0;
    }

    // ENEMY BULLETS
    let bullets = nearest(state.enemy_bullets.as_slice(), |b| b.id, origin, layout.bullet_slots);
    for (slot, &i) in bullets.iter().enumerate() {
        let bullet = &state.enemy_bullets[i];
        let base = layout.bullet_offset() + slot * ObservationLayout::BULLET_WIDTH;
        data[base] = normalize_coord(bullet.pos.x, width);
        data[base + 1] = normalize_coord(bullet.pos.y, height);
        data[base + 2] = 1.0;
    }

    // SCALARS
    let base = layout.scalar_offset();
    data[base] = ratio(hero.score as f32, layout.score_scale);
    data[base + 1] = ratio(hero.lives as f32, config.initial_lives as f32);
    data[base + 2] = ratio(state.step_count as f32, config.max_steps as f32);
    data[base + 3] = ratio(hero.cooldown as f32, config.fire_cooldown as f32);

    // DIFFICULTY
    if layout.include_difficulty {
        let base = layout.difficulty_offset();
        if let Some(controller) = difficulty {
            data[base] = clamp_unit(controller.difficulty);
            data[base + 1] = controller.spawn_level();
            data[base + 2] = controller.fire_level();
        }
    }

    Observation(data)
}
