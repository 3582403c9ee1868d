//! Episode controller
//!
//! `ShooterEnv` owns one simulation and exposes the reset/step contract a
//! trainer drives. Each step runs the full pipeline in a fixed order:
//! decode, advance, collide, spawn, reward, observe, terminate.

pub mod action;
pub mod info;
pub mod observation;
pub mod reward;
pub mod vec_env;

pub use action::{Action, ActionSpace, FIRE_INDEX, Intent};
pub use info::{EpisodeStats, StepInfo};
pub use observation::{Observation, encode};
pub use reward::{RewardBreakdown, compute_reward};
pub use vec_env::VecEnv;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;
use crate::error::ConfigError;
use crate::sim::{
    self, Body, DifficultyController, GameState, Snapshot, enemy_fire_phase, spawn_step,
};

/// Where the current episode is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    Running,
    /// Lives exhausted
    Terminated,
    /// Step budget exhausted
    Truncated,
}

impl EpisodeStatus {
    pub fn is_done(&self) -> bool {
        !matches!(self, EpisodeStatus::Running)
    }

    pub fn terminated(&self) -> bool {
        matches!(self, EpisodeStatus::Terminated)
    }

    pub fn truncated(&self) -> bool {
        matches!(self, EpisodeStatus::Truncated)
    }
}

/// Result of one `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

impl StepOutcome {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A single arcade-shooter environment
#[derive(Debug, Clone)]
pub struct ShooterEnv {
    config: EnvConfig,
    state: GameState,
    status: EpisodeStatus,
    stats: EpisodeStats,
    difficulty: Option<DifficultyController>,
    /// Source of episode seeds for `reset(None)`
    seeds: Pcg32,
    last_observation: Observation,
    last_info: StepInfo,
}

impl ShooterEnv {
    /// Validate `config` and start a first episode seeded with `config.seed`
    pub fn new(config: EnvConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = GameState::new(config.seed, &config);
        let difficulty = config.difficulty.map(DifficultyController::new);
        let stats = EpisodeStats::default();
        let last_observation = encode(&state, &config, difficulty.as_ref());
        let last_info =
            StepInfo::from_state(&state, &stats, RewardBreakdown::default(), difficulty.as_ref());

        log::debug!(
            "Created {} env: {} actions, observation size {}",
            config.preset.as_str(),
            config.action_space.as_str(),
            config.observation_size()
        );

        Ok(Self {
            seeds: Pcg32::seed_from_u64(config.seed),
            config,
            state,
            status: EpisodeStatus::Running,
            stats,
            difficulty,
            last_observation,
            last_info,
        })
    }

    /// Start a new episode. Without a seed, one is drawn from this env's seed stream.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, StepInfo) {
        let seed = seed.unwrap_or_else(|| self.seeds.random());

        self.state = GameState::new(seed, &self.config);
        self.status = EpisodeStatus::Running;
        self.stats = EpisodeStats::default();
        if let Some(difficulty) = &mut self.difficulty {
            difficulty.reset();
        }

        self.last_observation = encode(&self.state, &self.config, self.difficulty.as_ref());
        self.last_info = StepInfo::from_state(
            &self.state,
            &self.stats,
            RewardBreakdown::default(),
            self.difficulty.as_ref(),
        );
        log::debug!("reset: seed {}", seed);

        (self.last_observation.clone(), self.last_info.clone())
    }

    /// Advance one step
    ///
    /// On a finished episode this is a no-op that repeats the last observation
    /// with zero reward and the same flags.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        if self.status.is_done() {
            log::warn!("step called on a finished episode ({:?}); call reset", self.status);
            let mut info = self.last_info.clone();
            info.reward = RewardBreakdown::default();
            return StepOutcome {
                observation: self.last_observation.clone(),
                reward: 0.0,
                terminated: self.status.terminated(),
                truncated: self.status.truncated(),
                info,
            };
        }

        let config = &self.config;
        let state = &mut self.state;

        let intent = config.action_space.decode(&action);
        let alive_before = state.hero.is_alive();

        let events = sim::advance(state, &intent, config);
        let collisions = sim::resolve(state);

        let (spawn_prob, fire_prob) = match &self.difficulty {
            Some(d) => (d.spawn_prob, d.fire_prob),
            None => (config.enemy_spawn_prob, config.enemy_fire_prob),
        };
        let spawned = u32::from(spawn_step(state, config, spawn_prob).is_some());
        enemy_fire_phase(state, config, fire_prob);
        state.normalize_order();
        state.step_count += 1;

        let breakdown = compute_reward(alive_before, state, &collisions, &events, config);
        let reward = breakdown.total();
        self.stats.record(&events, &collisions, spawned, reward);

        if let Some(difficulty) = &mut self.difficulty {
            difficulty.update(state.step_count, self.stats.efficiency(state.step_count));
        }

        let observation = encode(state, config, self.difficulty.as_ref());

        self.status = if !state.hero.is_alive() {
            EpisodeStatus::Terminated
        } else if state.step_count >= config.max_steps {
            EpisodeStatus::Truncated
        } else {
            EpisodeStatus::Running
        };

        if self.status.is_done() {
            log::info!(
                "Episode {:?} after {} steps: score {}, lives {}, accuracy {:.2}, return {:.2}",
                self.status,
                state.step_count,
                state.hero.score,
                state.hero.lives,
                self.stats.accuracy(),
                self.stats.total_reward
            );
        }

        let info = StepInfo::from_state(state, &self.stats, breakdown, self.difficulty.as_ref());
        self.last_observation = observation.clone();
        self.last_info = info.clone();

        StepOutcome {
            observation,
            reward,
            terminated: self.status.terminated(),
            truncated: self.status.truncated(),
            info,
        }
    }

    /// Place an enemy by hand for scripted scenarios and curricula
    ///
    /// Respects the enemy capacity. Returns `None` when full or when the
    /// episode has ended.
    pub fn place_enemy(&mut self, pos: Vec2, speed: f32) -> Option<u32> {
        if self.status.is_done() || self.state.enemies.len() >= self.config.enemy_capacity {
            return None;
        }
        let id = self.state.insert_enemy(pos, self.config.enemy_size, speed);
        self.last_observation = encode(&self.state, &self.config, self.difficulty.as_ref());
        self.last_info.enemies = self.state.enemies.len();
        Some(id)
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn observation_size(&self) -> usize {
        self.config.observation_size()
    }

    pub fn action_space(&self) -> ActionSpace {
        self.config.action_space
    }

    pub fn action_dims(&self) -> &'static [usize] {
        self.config.action_space.dims()
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    /// Read-only view of the simulation (for display layers)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    pub fn difficulty(&self) -> Option<&DifficultyController> {
        self.difficulty.as_ref()
    }

    pub fn last_observation(&self) -> &Observation {
        &self.last_observation
    }
}
