//! Entity model
//!
//! Plain data records for the hero, enemies and bullets. Every kind shares the
//! `Body` capability (positioned, boxed, alive) so collision and rendering code
//! can treat them uniformly without probing for fields at runtime.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test: boxes that only touch along an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// True when the box lies entirely above 0 or entirely below `height`
    #[inline]
    pub fn outside_vertical(&self, height: f32) -> bool {
        self.max.y < 0.0 || self.min.y > height
    }
}

/// Shared capability of every simulated entity
pub trait Body {
    /// Box centre in screen pixels
    fn center(&self) -> Vec2;
    /// Box extents (width, height)
    fn size(&self) -> Vec2;

    fn is_alive(&self) -> bool {
        true
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center(), self.size())
    }

    fn overlaps<B: Body + ?Sized>(&self, other: &B) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// The agent-controlled plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub pos: Vec2,
    pub size: Vec2,
    pub lives: u32,
    /// Steps until the next shot is allowed
    pub cooldown: u32,
    /// Cumulative kills this episode
    pub score: u32,
    /// Last movement direction, each component in {-1, 0, 1}
    pub heading: Vec2,
}

impl Hero {
    pub fn new(pos: Vec2, size: Vec2, lives: u32) -> Self {
        Self {
            pos,
            size,
            lives,
            cooldown: 0,
            score: 0,
            heading: Vec2::ZERO,
        }
    }

    /// Lose one life per hit, never going below zero
    pub fn take_hits(&mut self, hits: u32) {
        self.lives = self.lives.saturating_sub(hits);
    }

    pub fn can_fire(&self) -> bool {
        self.is_alive() && self.cooldown == 0
    }

    /// Move by `delta`, keeping the whole box on screen
    pub fn translate_clamped(&mut self, delta: Vec2, screen: Vec2) {
        let half = self.size * 0.5;
        let max = (screen - half).max(half);
        self.pos = (self.pos + delta).clamp(half, max);
    }

    /// Centre point of the top edge, where hero shots appear
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size.y * 0.5)
    }
}

impl Body for Hero {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn is_alive(&self) -> bool {
        self.lives > 0
    }
}

/// A hostile plane drifting down the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward displacement per step (pixels)
    pub speed: f32,
}

impl Enemy {
    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    /// Centre point of the bottom edge, where enemy shots appear
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size.y * 0.5)
    }
}

impl Body for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Who fired a bullet. Bookkeeping only, never used for lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Hero,
    Enemy { shooter: u32 },
}

/// A projectile travelling vertically at constant velocity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
}

impl Bullet {
    /// Upward hero shot centred on `muzzle`'s x, resting on the muzzle edge
    pub fn hero_shot(id: u32, muzzle: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(muzzle.x, muzzle.y - size.y * 0.5),
            size,
            vel: Vec2::new(0.0, -speed),
            owner: BulletOwner::Hero,
        }
    }

    /// Downward enemy shot hanging below `muzzle`
    pub fn enemy_shot(id: u32, shooter: u32, muzzle: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(muzzle.x, muzzle.y + size.y * 0.5),
            size,
            vel: Vec2::new(0.0, speed),
            owner: BulletOwner::Enemy { shooter },
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

impl Body for Bullet {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Borrowed view over any entity kind
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Hero(&'a Hero),
    Enemy(&'a Enemy),
    Bullet(&'a Bullet),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Hero(_) => EntityKind::Hero,
            EntityRef::Enemy(_) => EntityKind::Enemy,
            EntityRef::Bullet(b) => match b.owner {
                BulletOwner::Hero => EntityKind::HeroBullet,
                BulletOwner::Enemy { .. } => EntityKind::EnemyBullet,
            },
        }
    }
}

impl Body for EntityRef<'_> {
    fn center(&self) -> Vec2 {
        match self {
            EntityRef::Hero(h) => h.center(),
            EntityRef::Enemy(e) => e.center(),
            EntityRef::Bullet(b) => b.center(),
        }
    }

    fn size(&self) -> Vec2 {
        match self {
            EntityRef::Hero(h) => h.size(),
            EntityRef::Enemy(e) => e.size(),
            EntityRef::Bullet(b) => b.size(),
        }
    }

    fn is_alive(&self) -> bool {
        match self {
            EntityRef::Hero(h) => h.is_alive(),
            EntityRef::Enemy(e) => e.is_alive(),
            EntityRef::Bullet(b) => b.is_alive(),
        }
    }
}

/// Entity category tag (used by snapshots)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Hero,
    Enemy,
    HeroBullet,
    EnemyBullet,
}
