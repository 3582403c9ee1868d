//! Plane Fighter entry point
//!
//! Headless rollout driver: runs a uniformly random policy on a batch of
//! environments and prints a JSON summary of the finished episodes.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use plane_fighter::{ConfigError, EnvConfig, Preset, VecEnv};

#[derive(Parser)]
#[command(name = "plane-fighter", about = "Random-policy rollouts for the Plane Fighter environment")]
struct Cli {
    /// Environment preset (classic, extended, integrated)
    #[arg(long, default_value = "classic", value_parser = parse_preset)]
    preset: Preset,

    /// JSON config file (overrides --preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Episodes to collect before stopping
    #[arg(long, default_value_t = 8)]
    episodes: usize,

    /// Environments stepped in parallel
    #[arg(long, default_value_t = 4)]
    envs: usize,

    /// Batch seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the per-episode step budget
    #[arg(long)]
    max_steps: Option<u32>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn parse_preset(s: &str) -> Result<Preset, ConfigError> {
    Preset::from_str(s).ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
}

#[derive(Debug, Serialize)]
struct EpisodeRecord {
    env: usize,
    steps: u32,
    score: u32,
    lives: u32,
    terminated: bool,
    total_reward: f32,
    accuracy: f32,
}

#[derive(Debug, Serialize)]
struct Summary {
    preset: &'static str,
    observation_size: usize,
    episodes: usize,
    mean_reward: f32,
    mean_length: f32,
    mean_kills: f32,
    records: Vec<EpisodeRecord>,
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    sum / count.max(1) as f32
}

fn build_config(cli: &Cli) -> Result<EnvConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => EnvConfig::load(path)?,
        None => EnvConfig::from_preset(cli.preset),
    };
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if cli.dump_config {
        match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.envs == 0 {
        eprintln!("--envs must be at least 1");
        std::process::exit(1);
    }

    let mut vec_env = match VecEnv::new(config.clone(), cli.envs, cli.seed) {
        Ok(vec_env) => vec_env,
        Err(e) => {
            eprintln!("Failed to create environments: {}", e);
            std::process::exit(1);
        }
    };
    let mut policy_rng = Pcg32::seed_from_u64(cli.seed ^ 0x9E37_79B9_7F4A_7C15);

    log::info!(
        "Collecting {} episodes with {} x {}",
        cli.episodes,
        cli.envs,
        config.preset.as_str()
    );

    vec_env.reset_all();
    let mut records = Vec::with_capacity(cli.episodes);
    let mut kills = Vec::with_capacity(cli.episodes);
    while records.len() < cli.episodes {
        let actions = vec_env.sample_actions(&mut policy_rng);
        for (env, outcome) in vec_env.step_all(&actions).into_iter().enumerate() {
            if !outcome.done() || records.len() >= cli.episodes {
                continue;
            }
            let stats = outcome.info.stats;
            kills.push(stats.kills as f32);
            records.push(EpisodeRecord {
                env,
                steps: outcome.info.step_count,
                score: outcome.info.score,
                lives: outcome.info.lives,
                terminated: outcome.terminated,
                total_reward: stats.total_reward,
                accuracy: stats.accuracy(),
            });
        }
    }

    let summary = Summary {
        preset: config.preset.as_str(),
        observation_size: config.observation_size(),
        episodes: records.len(),
        mean_reward: mean(records.iter().map(|r| r.total_reward)),
        mean_length: mean(records.iter().map(|r| r.steps as f32)),
        mean_kills: mean(kills.into_iter()),
        records,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize summary: {}", e);
            std::process::exit(1);
        }
    }
}
