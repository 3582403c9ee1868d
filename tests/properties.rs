//! Invariants that must hold for every seed and action sequence

use proptest::prelude::*;

use plane_fighter::sim::{Body, GameState, resolve};
use plane_fighter::{Action, EnvConfig, Preset, ShooterEnv};

fn preset_strategy() -> impl Strategy<Value = Preset> {
    prop_oneof![
        Just(Preset::Classic),
        Just(Preset::Extended),
        Just(Preset::Integrated),
    ]
}

/// Raw action components, deliberately including out-of-range values
fn raw_actions() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec((-2i64..12, -1i64..4, -1i64..3), 1..300)
}

fn to_action(config: &EnvConfig, (a, b, c): (i64, i64, i64)) -> Action {
    match config.action_space {
        plane_fighter::ActionSpace::Discrete9 => Action::Discrete(a),
        plane_fighter::ActionSpace::MultiDiscrete332 => Action::MultiDiscrete([b, a % 4, c]),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn observations_stay_in_unit_range(
        preset in preset_strategy(),
        seed in any::<u64>(),
        actions in raw_actions(),
    ) {
        let config = EnvConfig::from_preset(preset);
        let mut env = ShooterEnv::new(config.clone()).unwrap();
        let (obs, _) = env.reset(Some(seed));
        prop_assert!(obs.in_bounds());
        for raw in actions {
            let outcome = env.step(to_action(&config, raw));
            prop_assert_eq!(outcome.observation.len(), config.observation_size());
            prop_assert!(outcome.observation.in_bounds());
            prop_assert!(outcome.reward.is_finite());
            if outcome.done() {
                break;
            }
        }
    }

    #[test]
    fn enemy_count_never_exceeds_capacity(
        seed in any::<u64>(),
        capacity in 0usize..6,
        spawn_prob in 0.0f64..=1.0,
        actions in raw_actions(),
    ) {
        let config = EnvConfig {
            enemy_capacity: capacity,
            initial_enemies: capacity.min(1),
            enemy_spawn_prob: spawn_prob,
            ..EnvConfig::default()
        };
        let mut env = ShooterEnv::new(config.clone()).unwrap();
        env.reset(Some(seed));
        for raw in actions {
            let outcome = env.step(to_action(&config, raw));
            prop_assert!(env.state().enemies.len() <= capacity);
            prop_assert!(env.state().enemy_bullets.len() <= config.enemy_bullet_capacity);
            prop_assert!(env.state().hero_bullets.len() <= config.hero_bullet_capacity);
            if outcome.done() {
                break;
            }
        }
    }

    #[test]
    fn hero_and_bullets_stay_in_playfield(
        seed in any::<u64>(),
        actions in raw_actions(),
    ) {
        let config = EnvConfig {
            enemy_fire_prob: 0.05,
            ..EnvConfig::default()
        };
        let mut env = ShooterEnv::new(config.clone()).unwrap();
        env.reset(Some(seed));
        let half = config.hero_size * 0.5;
        for raw in actions {
            let outcome = env.step(to_action(&config, raw));
            let state = env.state();
            let hero = state.hero.center();
            prop_assert!(hero.x >= half.x && hero.x <= config.screen_width - half.x);
            prop_assert!(hero.y >= half.y && hero.y <= config.screen_height - half.y);
            for bullet in state.hero_bullets.iter().chain(&state.enemy_bullets) {
                prop_assert!(!bullet.bounds().outside_vertical(config.screen_height));
            }
            if outcome.done() {
                break;
            }
        }
    }

    #[test]
    fn reward_terms_are_bounded(
        seed in any::<u64>(),
        actions in raw_actions(),
    ) {
        let config = EnvConfig {
            enemy_spawn_prob: 0.05,
            enemy_fire_prob: 0.05,
            ..EnvConfig::default()
        };
        let weights = config.rewards;
        let mut env = ShooterEnv::new(config.clone()).unwrap();
        env.reset(Some(seed));
        for raw in actions {
            let outcome = env.step(to_action(&config, raw));
            let r = outcome.info.reward;
            prop_assert!(r.survival == 0.0 || r.survival == weights.survival);
            prop_assert!(r.kill >= 0.0 && r.kill <= weights.kill * config.enemy_capacity as f32);
            prop_assert!(r.enemy_collision <= 0.0);
            prop_assert!(r.enemy_collision >= weights.enemy_collision * config.enemy_capacity as f32);
            prop_assert!(r.bullet_collision <= 0.0);
            prop_assert!(
                r.bullet_collision >= weights.bullet_collision * config.enemy_bullet_capacity as f32
            );
            prop_assert!(r.safe_zone == 0.0 || r.safe_zone == weights.safe_zone);
            prop_assert!(r.attack_range == 0.0 || r.attack_range == weights.attack_range);
            prop_assert!(r.fire == 0.0 || r.fire == weights.fire);
            prop_assert!(r.reloading == 0.0 || r.reloading == weights.reloading);
            // A step that fired always leaves the weapon reloading
            if r.fire != 0.0 {
                prop_assert_eq!(r.reloading, weights.reloading);
            }
            prop_assert!((outcome.reward - r.total()).abs() < 1e-6);
            if outcome.done() {
                break;
            }
        }
    }

    #[test]
    fn collision_outcome_ignores_collection_order(
        seed in any::<u64>(),
        offsets in prop::collection::vec((-60.0f32..60.0, -60.0f32..60.0), 0..8),
    ) {
        let config = EnvConfig {
            initial_enemies: 4,
            ..EnvConfig::default()
        };
        let mut forward = GameState::new(seed, &config);
        let anchors: Vec<_> = forward.enemies.iter().map(|e| e.center()).collect();
        for (i, (dx, dy)) in offsets.iter().enumerate() {
            let anchor = anchors[i % anchors.len()];
            let id = forward.next_entity_id();
            forward.hero_bullets.push(plane_fighter::sim::Bullet::hero_shot(
                id,
                anchor + glam::Vec2::new(*dx, *dy),
                config.hero_bullet_size,
                config.hero_bullet_speed,
            ));
        }
        let mut reversed = forward.clone();
        reversed.enemies.reverse();
        reversed.hero_bullets.reverse();

        let a = resolve(&mut forward);
        let b = resolve(&mut reversed);
        prop_assert_eq!(a.kills, b.kills);
        prop_assert_eq!(a.bullets_spent, b.bullets_spent);
        reversed.normalize_order();
        prop_assert_eq!(&forward.enemies, &reversed.enemies);
        prop_assert_eq!(&forward.hero_bullets, &reversed.hero_bullets);
    }
}
