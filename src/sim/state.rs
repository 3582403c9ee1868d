//! Game state and core simulation types
//!
//! Everything one episode mutates lives here, including its own RNG stream.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Bullet, Enemy, EntityKind, EntityRef, Hero};
use super::spawner;
use crate::config::EnvConfig;

/// Complete per-episode simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Episode seed
    pub seed: u64,
    /// Episode RNG (spawning and enemy fire only)
    pub rng: Pcg32,
    /// Steps taken this episode
    pub step_count: u32,
    pub hero: Hero,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Hero bullets in flight (sorted by id)
    pub hero_bullets: Vec<Bullet>,
    /// Enemy bullets in flight (sorted by id)
    pub enemy_bullets: Vec<Bullet>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh episode: hero at its spawn point plus the initial enemies
    pub fn new(seed: u64, config: &EnvConfig) -> Self {
        let hero = Hero::new(config.hero_spawn(), config.hero_size, config.initial_lives);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            step_count: 0,
            hero,
            enemies: Vec::with_capacity(config.enemy_capacity),
            hero_bullets: Vec::with_capacity(config.hero_bullet_capacity),
            enemy_bullets: Vec::with_capacity(config.enemy_bullet_capacity),
            next_id: 1,
        };

        let initial = config.initial_enemies.min(config.enemy_capacity);
        for _ in 0..initial {
            spawner::spawn_enemy(&mut state, config);
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an enemy with a fresh id (ignores capacity)
    pub fn insert_enemy(&mut self, pos: Vec2, size: Vec2, speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos,
            size,
            speed,
        });
        id
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.hero_bullets.sort_by_key(|b| b.id);
        self.enemy_bullets.sort_by_key(|b| b.id);
    }

    /// Nearest enemy to the hero: (squared distance, enemy). Ties go to the lower id.
    pub fn nearest_enemy(&self) -> Option<(f32, &Enemy)> {
        let hero = self.hero.center();
        self.enemies
            .iter()
            .map(|e| (e.center().distance_squared(hero), e))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)))
    }

    /// Every entity in a stable order: hero, enemies, hero bullets, enemy bullets
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        std::iter::once(EntityRef::Hero(&self.hero))
            .chain(self.enemies.iter().map(EntityRef::Enemy))
            .chain(self.hero_bullets.iter().map(EntityRef::Bullet))
            .chain(self.enemy_bullets.iter().map(EntityRef::Bullet))
    }

    /// Serializable picture of the current frame for a display layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.step_count,
            lives: self.hero.lives,
            score: self.hero.score,
            bodies: self
                .entities()
                .map(|entity| BodySnapshot {
                    kind: entity.kind(),
                    center: entity.center(),
                    size: entity.size(),
                })
                .collect(),
        }
    }
}

/// One entity as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub kind: EntityKind,
    pub center: Vec2,
    pub size: Vec2,
}

/// Read-only frame description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: u32,
    pub lives: u32,
    pub score: u32,
    pub bodies: Vec<BodySnapshot>,
}
