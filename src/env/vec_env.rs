//! Vectorized environments
//!
//! N independent `ShooterEnv`s stepped in parallel with rayon. Instances share
//! nothing; seeds for construction and auto-resets come from one batch RNG
//! drawn sequentially, so a batch is reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rayon::prelude::*;

use super::{Action, ActionSpace, Observation, ShooterEnv, StepInfo, StepOutcome};
use crate::config::EnvConfig;
use crate::error::ConfigError;

/// A batch of environments sharing one configuration
#[derive(Debug, Clone)]
pub struct VecEnv {
    envs: Vec<ShooterEnv>,
    rng: Pcg32,
}

impl VecEnv {
    pub fn new(config: EnvConfig, n_envs: usize, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let envs = (0..n_envs)
            .map(|_| {
                ShooterEnv::new(EnvConfig {
                    seed: rng.random(),
                    ..config.clone()
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "VecEnv: {} x {} ({} actions, observation size {})",
            n_envs,
            config.preset.as_str(),
            config.action_space.as_str(),
            config.observation_size()
        );
        Ok(Self { envs, rng })
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn envs(&self) -> &[ShooterEnv] {
        &self.envs
    }

    pub fn action_space(&self) -> Option<ActionSpace> {
        self.envs.first().map(|env| env.action_space())
    }

    /// One uniformly random action per environment
    pub fn sample_actions<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Action> {
        self.envs
            .iter()
            .map(|env| env.action_space().sample(rng))
            .collect()
    }

    /// Reset every environment with fresh seeds
    pub fn reset_all(&mut self) -> Vec<(Observation, StepInfo)> {
        // Seeds are drawn sequentially so the batch stays reproducible
        let seeds: Vec<u64> = (0..self.envs.len()).map(|_| self.rng.random()).collect();
        self.envs
            .par_iter_mut()
            .zip(seeds.into_par_iter())
            .map(|(env, seed)| env.reset(Some(seed)))
            .collect()
    }

    /// Step every environment in parallel
    ///
    /// Finished environments are reset immediately: their outcome keeps the
    /// terminal reward and flags, carries the new episode's first observation,
    /// and stores the terminal observation in `info.final_observation`.
    /// Missing actions are treated as no-ops.
    pub fn step_all(&mut self, actions: &[Action]) -> Vec<StepOutcome> {
        if actions.len() != self.envs.len() {
            log::warn!(
                "step_all: got {} actions for {} environments",
                actions.len(),
                self.envs.len()
            );
        }
        let actions: Vec<Action> = self
            .envs
            .iter()
            .enumerate()
            .map(|(i, env)| {
                actions
                    .get(i)
                    .copied()
                    .unwrap_or_else(|| env.action_space().noop())
            })
            .collect();

        let mut outcomes: Vec<StepOutcome> = self
            .envs
            .par_iter_mut()
            .zip(actions.into_par_iter())
            .map(|(env, action)| env.step(action))
            .collect();

        let reset_seeds: Vec<Option<u64>> = outcomes
            .iter()
            .map(|outcome| outcome.done().then(|| self.rng.random()))
            .collect();

        let resets: Vec<Option<Observation>> = self
            .envs
            .par_iter_mut()
            .zip(reset_seeds.into_par_iter())
            .map(|(env, seed)| seed.map(|seed| env.reset(Some(seed)).0))
            .collect();

        for (outcome, reset) in outcomes.iter_mut().zip(resets) {
            if let Some(first) = reset {
                let terminal = std::mem::replace(&mut outcome.observation, first);
                outcome.info.final_observation = Some(terminal.into_vec());
            }
        }
        outcomes
    }
}
