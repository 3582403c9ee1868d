//! Admission control for new enemies and enemy bullets
//!
//! Both admissions are a single Bernoulli draw per candidate, bounded by the
//! configured capacity. Attempts at capacity are dropped silently.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Body, Bullet, Enemy};
use super::state::GameState;
use crate::config::EnvConfig;
use crate::consts::SPAWN_MARGIN;

/// Sample `[lo, hi]`, collapsing to the midpoint when the band is empty
fn sample_band(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    }
}

/// Roll an enemy spawn. Returns the new enemy's id when one was admitted.
///
/// Nothing is drawn from the RNG when the enemy collection is already full.
pub fn spawn_step(state: &mut GameState, config: &EnvConfig, prob: f64) -> Option<u32> {
    if state.enemies.len() >= config.enemy_capacity || prob <= 0.0 {
        return None;
    }
    if !state.rng.random_bool(prob.min(1.0)) {
        return None;
    }
    let id = spawn_enemy(state, config);
    log::trace!("step {}: spawned enemy {}", state.step_count, id);
    Some(id)
}

/// Place a new enemy on the side of the playfield opposite the hero's start
///
/// The sampled x is the box's left edge; positions are stored as centres.
pub(crate) fn spawn_enemy(state: &mut GameState, config: &EnvConfig) -> u32 {
    let left = sample_band(
        &mut state.rng,
        config.screen_width * 0.5,
        config.screen_width * 0.7,
    );
    let x = left + config.enemy_size.x * 0.5;
    let y = sample_band(
        &mut state.rng,
        SPAWN_MARGIN,
        config.screen_height - SPAWN_MARGIN,
    );
    let speed = sample_band(&mut state.rng, config.enemy_speed_min, config.enemy_speed_max);

    state.insert_enemy(Vec2::new(x, y), config.enemy_size, speed)
}

/// Roll a single enemy's shot. The returned bullet has id 0 until admitted.
pub fn enemy_fire_step(
    enemy: &Enemy,
    rng: &mut Pcg32,
    config: &EnvConfig,
    prob: f64,
) -> Option<Bullet> {
    if prob <= 0.0 || !rng.random_bool(prob.min(1.0)) {
        return None;
    }
    let bullet = Bullet::enemy_shot(
        0,
        enemy.id,
        enemy.muzzle(),
        config.enemy_bullet_size,
        config.enemy_bullet_speed,
    );
    // Shots that would start below the playfield are dropped
    if bullet.bounds().outside_vertical(config.screen_height) {
        return None;
    }
    Some(bullet)
}

/// Let every enemy try to fire, in id order. Returns the number of bullets admitted.
///
/// Each enemy always draws, so the RNG stream does not depend on how many
/// bullets are already in flight.
pub fn enemy_fire_phase(state: &mut GameState, config: &EnvConfig, prob: f64) -> usize {
    let mut shots = Vec::new();
    for enemy in &state.enemies {
        if let Some(bullet) = enemy_fire_step(enemy, &mut state.rng, config, prob) {
            shots.push(bullet);
        }
    }

    let mut admitted = 0;
    for mut bullet in shots {
        if state.enemy_bullets.len() >= config.enemy_bullet_capacity {
            break;
        }
        bullet.id = state.next_entity_id();
        log::trace!("step {}: enemy bullet {}", state.step_count, bullet.id);
        state.enemy_bullets.push(bullet);
        admitted += 1;
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_at_capacity_is_dropped() {
        let config = EnvConfig::default();
        let mut state = GameState::new(3, &config);
        while state.enemies.len() < config.enemy_capacity {
            spawn_enemy(&mut state, &config);
        }
        for _ in 0..100 {
            assert_eq!(spawn_step(&mut state, &config, 1.0), None);
        }
        assert_eq!(state.enemies.len(), config.enemy_capacity);
    }

    #[test]
    fn test_spawn_certain_and_never() {
        let config = EnvConfig {
            initial_enemies: 0,
            ..EnvConfig::default()
        };
        let mut state = GameState::new(3, &config);
        assert_eq!(spawn_step(&mut state, &config, 0.0), None);
        assert!(spawn_step(&mut state, &config, 1.0).is_some());
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_spawn_region() {
        let config = EnvConfig {
            initial_enemies: 0,
            enemy_capacity: 1000,
            ..EnvConfig::default()
        };
        let mut state = GameState::new(11, &config);
        for _ in 0..500 {
            spawn_enemy(&mut state, &config);
        }
        for enemy in &state.enemies {
            // Left edge in [w/2, 0.7w]
            let left = enemy.bounds().min.x;
            assert!(left >= config.screen_width * 0.5 - 1e-3);
            assert!(left <= config.screen_width * 0.7 + 1e-3);
            assert!((enemy.pos.x - left - config.enemy_size.x * 0.5).abs() < 1e-3);
            assert!(enemy.pos.y >= SPAWN_MARGIN);
            assert!(enemy.pos.y <= config.screen_height - SPAWN_MARGIN);
            assert!(enemy.speed >= config.enemy_speed_min);
            assert!(enemy.speed <= config.enemy_speed_max);
        }
    }

    #[test]
    fn test_degenerate_band_uses_midpoint() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(sample_band(&mut rng, 10.0, 10.0), 10.0);
        assert_eq!(sample_band(&mut rng, 20.0, 10.0), 15.0);
    }

    #[test]
    fn test_enemy_fire_respects_capacity() {
        let config = EnvConfig {
            enemy_bullet_capacity: 2,
            initial_enemies: 5,
            ..EnvConfig::default()
        };
        let mut state = GameState::new(8, &config);
        assert_eq!(enemy_fire_phase(&mut state, &config, 1.0), 2);
        assert_eq!(enemy_fire_phase(&mut state, &config, 1.0), 0);
        assert_eq!(state.enemy_bullets.len(), 2);
        assert!(state.enemy_bullets[0].id < state.enemy_bullets[1].id);
    }

    #[test]
    fn test_no_shots_from_below_the_playfield() {
        let config = EnvConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let sinking = Enemy {
            id: 1,
            pos: Vec2::new(700.0, config.screen_height + 15.0),
            size: config.enemy_size,
            speed: 1.0,
        };
        assert!(enemy_fire_step(&sinking, &mut rng, &config, 1.0).is_none());
    }

    #[test]
    fn test_enemy_fire_never() {
        let config = EnvConfig::default();
        let mut state = GameState::new(8, &config);
        assert_eq!(enemy_fire_phase(&mut state, &config, 0.0), 0);
        assert!(state.enemy_bullets.is_empty());
    }
}
