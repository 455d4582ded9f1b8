use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use ordered_float::OrderedFloat;

use intersection_sim::render::draw_map;
use intersection_sim::simulation::{IntersectionConfig, TrafficSignalEnv};
use intersection_sim::stats::RunStats;

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Signalised intersection simulation driven by a green-split policy")]
struct Cli {
    /// Number of episodes to run
    #[arg(long, default_value = "5")]
    episodes: u32,

    /// Fixed action for every step (NS green = action + 1)
    #[arg(long, default_value = "14")]
    action: usize,

    /// Evaluate every action and report the best one
    #[arg(long)]
    sweep: bool,

    /// Base seed; episode i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Arrival probability per lane per time unit
    #[arg(long, default_value = "0.1")]
    arrival_rate: f64,

    /// Yellow clearance taken from the end of each axis window
    #[arg(long, default_value = "0")]
    yellow: u32,

    /// Signal cycles per episode
    #[arg(long, default_value = "1")]
    cycles: u32,

    /// Maximum vehicles per lane before arrivals are dropped
    #[arg(long, default_value = "40")]
    max_per_lane: usize,

    /// Print the intersection after every episode
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = IntersectionConfig {
        arrival_rate: cli.arrival_rate,
        yellow: cli.yellow,
        episode_cycles: cli.cycles,
        max_vehicles_per_lane: cli.max_per_lane,
        seed: cli.seed,
        ..IntersectionConfig::default()
    };
    let mut env = TrafficSignalEnv::new(config).context("Invalid intersection configuration")?;

    if cli.sweep {
        run_sweep(&mut env, &cli)
    } else {
        let stats = run_policy(&mut env, &cli, cli.action)?;
        stats.log_summary();
        Ok(())
    }
}

/// Reset for episode `episode`, reseeding when a base seed was given
fn begin_episode(env: &mut TrafficSignalEnv, cli: &Cli, episode: u32) {
    match cli.seed {
        Some(seed) => env.reset_with_seed(seed.wrapping_add(u64::from(episode))),
        None => env.reset(),
    };
}

/// Run `cli.episodes` episodes always choosing `action`
fn run_policy(env: &mut TrafficSignalEnv, cli: &Cli, action: usize) -> Result<RunStats> {
    let mut stats = RunStats::default();

    for episode in 0..cli.episodes {
        begin_episode(env, cli, episode);
        let mut episode_reward = 0.0;

        loop {
            let step = env
                .step(action)
                .with_context(|| format!("Step failed in episode {}", episode))?;
            stats.record_step(&step);
            episode_reward += step.reward;

            if step.terminated || step.truncated {
                println!(
                    "Episode {}: t={} obs=({}, {}) reward={:.1}",
                    episode,
                    step.info.elapsed,
                    step.observation.ns,
                    step.observation.ew,
                    episode_reward
                );
                break;
            }
        }

        stats.finish_episode();

        if cli.map {
            print!("{}", draw_map(env.config(), env.signals(), env.vehicles()));
            println!();
        }
    }

    Ok(stats)
}

/// Try every action on the same episodes and report the one with the best mean reward
fn run_sweep(env: &mut TrafficSignalEnv, cli: &Cli) -> Result<()> {
    let mut results = Vec::with_capacity(env.action_count());

    for action in 0..env.action_count() {
        let stats = run_policy(env, cli, action)?;
        info!(
            "Action {:2} (NS {:2}): mean reward {:.2}",
            action,
            action + 1,
            stats.mean_reward()
        );
        results.push((action, stats));
    }

    let (best_action, best) = results
        .iter()
        .max_by_key(|(_, stats)| OrderedFloat(stats.mean_reward()))
        .context("No actions to evaluate")?;

    info!(
        "Best action: {} (NS green {}), mean reward {:.2}",
        best_action,
        best_action + 1,
        best.mean_reward()
    );
    best.log_summary();
    Ok(())
}
