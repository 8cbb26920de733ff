//! Self-play training binary.
//!
//! Usage:
//!   cargo run --release --bin train -- [OPTIONS]
//!
//! Every option overrides the matching value of the `--config` file. Agents are
//! checkpointed to `<checkpoint-dir>/Player{j}-{players}-{rows}x{cols}-{k}-last.json`
//! during training and once more at the end.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kinarow::{Agent, AppConfig, GameEngine, Trainer};

/// Train K-in-a-row agents by self-play.
#[derive(Parser)]
#[command(name = "train", about = "Train K-in-a-row agents by self-play")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<u64>,

    /// Override number of players
    #[arg(long)]
    players: Option<usize>,

    /// Override board height
    #[arg(long)]
    rows: Option<usize>,

    /// Override board width
    #[arg(long)]
    cols: Option<usize>,

    /// Override winning run length
    #[arg(long)]
    win_length: Option<usize>,

    /// Random seed for the agents
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for agent checkpoints
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    /// Write the final statistics to this JSON file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kinarow=info,train=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        config.training.episodes = episodes;
    }
    if let Some(players) = cli.players {
        config.game.players = players;
    }
    if let Some(rows) = cli.rows {
        config.game.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.game.cols = cols;
    }
    if let Some(win_length) = cli.win_length {
        config.game.win_length = win_length;
    }
    if let Some(seed) = cli.seed {
        config.q_learning.seed = Some(seed);
    }
    if let Some(dir) = cli.checkpoint_dir {
        config.training.checkpoint_dir = Some(dir);
    }
    config.validate().context("invalid configuration")?;

    let specs = config.agent_specs();
    if specs.iter().any(|spec| spec.is_human()) {
        bail!("human seats are not supported during training, use the play binary");
    }

    let game = &config.game;
    let episodes = config.training.episodes;
    info!(
        players = game.players,
        rows = game.rows,
        cols = game.cols,
        win_length = game.win_length,
        episodes,
        "starting training"
    );

    let agents = specs
        .iter()
        .enumerate()
        .map(|(player, spec)| {
            spec.build(player, game, &config.q_learning, episodes)
                .with_context(|| format!("building agent for player {}", player))
        })
        .collect::<Result<Vec<_>>>()?;

    let engine = GameEngine::new(game.clone())?;
    let mut trainer = Trainer::new(config.training.clone(), engine, agents)?;

    let pb = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(episodes)
    };
    pb.set_style(
        ProgressStyle::with_template(
            "{elapsed_precise} [{bar:40}] {pos}/{len} episodes ({per_sec}, ETA {eta}) {msg}",
        )?
        .progress_chars("=> "),
    );

    let interval = (episodes / 1000).max(1);
    let stats = trainer
        .train_with_callback(interval, |stats| {
            pb.set_position(stats.episodes);
            pb.set_message(format!("draws: {}", stats.draws));
        })?
        .clone();
    pb.finish_and_clear();

    trainer.checkpoint().context("writing final checkpoint")?;

    info!(
        episodes = stats.episodes,
        seconds = stats.elapsed_seconds,
        episodes_per_second = stats.episodes_per_second,
        "training complete"
    );
    for player in 0..stats.players() {
        info!(
            player,
            agent = trainer.agents()[player].name(),
            wins = stats.wins[player],
            losses = stats.losses[player],
            win_rate = stats.win_rate(player),
            "final totals"
        );
    }
    info!(draws = stats.draws, forfeits = stats.forfeits, "final totals");

    if let Some(path) = &cli.summary {
        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(path, json).with_context(|| format!("writing summary to {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }

    Ok(())
}
