//! Action spaces and decoding
//!
//! Two encodings are supported, fixed per environment:
//! - `Discrete9`: 0-7 move along N, NE, E, SE, S, SW, W, NW; 8 fires (no move)
//! - `MultiDiscrete332`: `[x, y, fire]` with x in {left, none, right},
//!   y in {up, none, down}, fire in {no, yes}
//!
//! Anything out of range decodes to a no-op.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use crate::sim::Intent;

/// Compass directions for `Discrete9` indices 0-7 (screen space, y down)
const COMPASS: [(f32, f32); 8] = [
    (0.0, -1.0),
    (1.0, -1.0),
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
];

/// Discrete index that fires instead of moving
pub const FIRE_INDEX: i64 = 8;

/// Declared action space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActionSpace {
    #[default]
    Discrete9,
    MultiDiscrete332,
}

/// A raw trainer action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Discrete(i64),
    MultiDiscrete([i64; 3]),
}

impl Action {
    pub fn from_index(index: i64) -> Self {
        Action::Discrete(index)
    }

    pub fn from_triple(triple: [i64; 3]) -> Self {
        Action::MultiDiscrete(triple)
    }
}

impl ActionSpace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionSpace::Discrete9 => "Discrete(9)",
            ActionSpace::MultiDiscrete332 => "MultiDiscrete([3, 3, 2])",
        }
    }

    /// Cardinality of each action component
    pub fn dims(&self) -> &'static [usize] {
        match self {
            ActionSpace::Discrete9 => &[9],
            ActionSpace::MultiDiscrete332 => &[3, 3, 2],
        }
    }

    /// The action that does nothing in this space
    pub fn noop(&self) -> Action {
        match self {
            // Discrete9 has no idle index; out-of-range decodes to idle
            ActionSpace::Discrete9 => Action::Discrete(-1),
            ActionSpace::MultiDiscrete332 => Action::MultiDiscrete([1, 1, 0]),
        }
    }

    /// Map a raw action to a movement/fire intent
    pub fn decode(&self, action: &Action) -> Intent {
        match (self, action) {
            (ActionSpace::Discrete9, Action::Discrete(index)) => decode_discrete(*index),
            (ActionSpace::MultiDiscrete332, Action::MultiDiscrete(triple)) => {
                decode_multi(*triple)
            }
            (space, action) => {
                log::warn!("{:?} is not a {} action, treating as no-op", action, space.as_str());
                Intent::IDLE
            }
        }
    }

    /// Draw a uniformly random valid action
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        match self {
            ActionSpace::Discrete9 => Action::Discrete(rng.random_range(0..=FIRE_INDEX)),
            ActionSpace::MultiDiscrete332 => Action::MultiDiscrete([
                rng.random_range(0..3),
                rng.random_range(0..3),
                rng.random_range(0..2),
            ]),
        }
    }
}

fn decode_discrete(index: i64) -> Intent {
    match index {
        0..=7 => {
            let (x, y) = COMPASS[index as usize];
            Intent::moving(x, y)
        }
        FIRE_INDEX => Intent::fire(),
        _ => Intent::IDLE,
    }
}

fn decode_multi([x, y, fire]: [i64; 3]) -> Intent {
    if !(0..3).contains(&x) || !(0..3).contains(&y) || !(0..2).contains(&fire) {
        return Intent::IDLE;
    }
    let mut intent = Intent::moving((x - 1) as f32, (y - 1) as f32);
    intent.fire = fire == 1;
    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_discrete_compass_table() {
        let space = ActionSpace::Discrete9;
        assert_eq!(space.decode(&Action::Discrete(0)).movement, Vec2::new(0.0, -1.0));
        assert_eq!(space.decode(&Action::Discrete(2)).movement, Vec2::new(1.0, 0.0));
        assert_eq!(space.decode(&Action::Discrete(5)).movement, Vec2::new(-1.0, 1.0));
        assert_eq!(space.decode(&Action::Discrete(7)).movement, Vec2::new(-1.0, -1.0));
        for i in 0..8 {
            assert!(!space.decode(&Action::Discrete(i)).fire);
        }
    }

    #[test]
    fn test_discrete_fire_suppresses_movement() {
        let intent = ActionSpace::Discrete9.decode(&Action::Discrete(FIRE_INDEX));
        assert!(intent.fire);
        assert_eq!(intent.movement, Vec2::ZERO);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let discrete = ActionSpace::Discrete9;
        assert_eq!(discrete.decode(&Action::Discrete(9)), Intent::IDLE);
        assert_eq!(discrete.decode(&Action::Discrete(-3)), Intent::IDLE);
        assert_eq!(discrete.decode(&discrete.noop()), Intent::IDLE);

        let multi = ActionSpace::MultiDiscrete332;
        assert_eq!(multi.decode(&Action::MultiDiscrete([3, 1, 0])), Intent::IDLE);
        assert_eq!(multi.decode(&Action::MultiDiscrete([1, 1, 2])), Intent::IDLE);
        assert_eq!(multi.decode(&multi.noop()), Intent::IDLE);
    }

    #[test]
    fn test_wrong_encoding_is_noop() {
        assert_eq!(
            ActionSpace::Discrete9.decode(&Action::MultiDiscrete([0, 0, 1])),
            Intent::IDLE
        );
        assert_eq!(
            ActionSpace::MultiDiscrete332.decode(&Action::Discrete(FIRE_INDEX)),
            Intent::IDLE
        );
    }

    #[test]
    fn test_multi_move_and_fire_independent() {
        let intent = ActionSpace::MultiDiscrete332.decode(&Action::from_triple([0, 2, 1]));
        assert_eq!(intent.movement, Vec2::new(-1.0, 1.0));
        assert!(intent.fire);
    }

    #[test]
    fn test_sample_is_valid() {
        let mut rng = Pcg32::seed_from_u64(4);
        for space in [ActionSpace::Discrete9, ActionSpace::MultiDiscrete332] {
            for _ in 0..200 {
                let action = space.sample(&mut rng);
                match (space, action) {
                    (ActionSpace::Discrete9, Action::Discrete(i)) => assert!((0..9).contains(&i)),
                    (ActionSpace::MultiDiscrete332, Action::MultiDiscrete(t)) => {
                        assert!(t[0] < 3 && t[1] < 3 && t[2] < 2 && t.iter().all(|v| *v >= 0))
                    }
                    _ => panic!("sampled action of the wrong encoding"),
                }
            }
        }
    }

    #[test]
    fn test_dims() {
        assert_eq!(ActionSpace::Discrete9.dims(), &[9]);
        assert_eq!(ActionSpace::MultiDiscrete332.dims(), &[3, 3, 2]);
    }
}
