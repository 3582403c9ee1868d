//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step only
//! - Seeded per-episode RNG only
//! - Stable iteration order (by entity ID)
//! - No trainer, rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, resolve};
pub use difficulty::{Adjustment, DifficultyController};
pub use entity::{Aabb, Body, Bullet, BulletOwner, Enemy, EntityKind, EntityRef, Hero};
pub use spawner::{enemy_fire_phase, enemy_fire_step, spawn_step};
pub use state::{BodySnapshot, GameState, Snapshot};
pub use tick::{Intent, StepEvents, advance};
