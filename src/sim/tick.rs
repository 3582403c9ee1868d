//! Fixed-step advance
//!
//! Moves the hero according to the decoded intent, fires if allowed, then
//! advances every projectile and enemy and drops whatever left the playfield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Bullet};
use super::state::GameState;
use crate::config::EnvConfig;

/// Movement and fire request for a single step (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Per-axis direction, each component in {-1, 0, 1}
    pub movement: Vec2,
    /// Request a shot
    pub fire: bool,
}

impl Intent {
    pub const IDLE: Intent = Intent {
        movement: Vec2::ZERO,
        fire: false,
    };

    pub fn moving(x: f32, y: f32) -> Self {
        Self {
            movement: Vec2::new(x, y),
            fire: false,
        }
    }

    pub fn fire() -> Self {
        Self {
            movement: Vec2::ZERO,
            fire: true,
        }
    }
}

/// What the advance stage did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    /// A hero bullet was emitted this step
    pub fired: bool,
    /// Hero bullets that left the top of the playfield
    pub hero_bullets_expired: u32,
    /// Enemy bullets that left the bottom of the playfield
    pub enemy_bullets_expired: u32,
    /// Enemies that drifted off the bottom
    pub enemies_escaped: u32,
}

/// Advance the game state by one fixed step
pub fn advance(state: &mut GameState, intent: &Intent, config: &EnvConfig) -> StepEvents {
    let mut events = StepEvents::default();
    let height = config.screen_height;

    state.hero.cooldown = state.hero.cooldown.saturating_sub(1);

    // Hero movement: each axis moves by the full step size
    let direction = intent.movement.clamp(Vec2::NEG_ONE, Vec2::ONE).round();
    state.hero.heading = direction;
    if direction != Vec2::ZERO {
        state
            .hero
            .translate_clamped(direction * config.move_speed, config.screen());
    }

    // Existing projectiles move before a new shot appears at the muzzle
    for bullet in state.hero_bullets.iter_mut().chain(state.enemy_bullets.iter_mut()) {
        bullet.advance();
    }
    events.hero_bullets_expired = drop_offscreen(&mut state.hero_bullets, height);
    events.enemy_bullets_expired = drop_offscreen(&mut state.enemy_bullets, height);

    if intent.fire
        && state.hero.can_fire()
        && state.hero_bullets.len() < config.hero_bullet_capacity
    {
        let id = state.next_entity_id();
        state.hero_bullets.push(Bullet::hero_shot(
            id,
            state.hero.muzzle(),
            config.hero_bullet_size,
            config.hero_bullet_speed,
        ));
        state.hero.cooldown = config.fire_cooldown;
        events.fired = true;
    }

    for enemy in &mut state.enemies {
        enemy.advance();
    }
    let before = state.enemies.len();
    state.enemies.retain(|enemy| enemy.bounds().min.y <= height);
    events.enemies_escaped = (before - state.enemies.len()) as u32;

    events
}

/// Remove bullets whose box is entirely above or below the playfield
fn drop_offscreen(bullets: &mut Vec<Bullet>, height: f32) -> u32 {
    let before = bullets.len();
    bullets.retain(|bullet| !bullet.bounds().outside_vertical(height));
    (before - bullets.len()) as u32
}
