//! Play against trained agents at the terminal.
//!
//! Usage:
//!   cargo run --release --bin play -- [OPTIONS]
//!
//! The human takes seat `--seat`. Every other seat gets the next `--load`
//! table (played greedily) or, once those run out, a random agent. A config
//! file with an `agents` list replaces this seating entirely.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kinarow::game::Outcome;
use kinarow::{Agent, AgentSpec, AppConfig, GameEngine, Trainer, TrainerConfig};

/// Play K-in-a-row against trained or random agents.
#[derive(Parser)]
#[command(name = "play", about = "Play K-in-a-row against trained agents")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

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

    /// Seat of the human player (0 moves first)
    #[arg(long, default_value_t = 0)]
    seat: usize,

    /// Q-table for the next computer seat; repeat for more seats
    #[arg(long)]
    load: Vec<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kinarow=warn,play=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
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
    config.validate().context("invalid configuration")?;

    let specs = if config.agents.is_empty() {
        seating(&cli, config.game.players)?
    } else {
        config.agents.clone()
    };

    let game = &config.game;
    let agents = specs
        .iter()
        .enumerate()
        .map(|(player, spec)| {
            spec.build(player, game, &config.q_learning, config.training.episodes)
                .with_context(|| format!("building agent for player {}", player))
        })
        .collect::<Result<Vec<_>>>()?;

    println!(
        "{} players on a {}x{} board, {} in a row wins. Cells are numbered 0 to {} row by row.",
        game.players,
        game.rows,
        game.cols,
        game.win_length,
        game.cells() - 1
    );
    for (player, agent) in agents.iter().enumerate() {
        println!("  Player {}: {}", player, agent.name());
    }

    let engine = GameEngine::new(game.clone())?;
    let mut trainer = Trainer::new(TrainerConfig::quick(cli.games.max(1)), engine, agents)?;

    for _ in 0..cli.games {
        let result = trainer.play_episode()?;
        println!();
        println!("{}", result.board);
        match result.outcome {
            Some(Outcome::Win(player)) => println!("Player {} wins", player),
            Some(Outcome::Draw) => println!("Draw"),
            Some(Outcome::Forfeit(player)) => {
                println!("Player {} played an occupied cell and forfeits", player)
            }
            None => {}
        }
    }

    if cli.games > 1 {
        let stats = trainer.stats();
        println!();
        for player in 0..stats.players() {
            println!(
                "Player {}. Wins: {}. Losses: {}",
                player, stats.wins[player], stats.losses[player]
            );
        }
        println!("Draws: {}", stats.draws);
    }

    Ok(())
}

/// Human at `cli.seat`, loaded tables in the remaining seats, random after that.
fn seating(cli: &Cli, players: usize) -> Result<Vec<AgentSpec>> {
    if cli.seat >= players {
        bail!("seat {} does not exist with {} players", cli.seat, players);
    }
    if cli.load.len() > players - 1 {
        bail!(
            "{} tables given but only {} computer seats",
            cli.load.len(),
            players - 1
        );
    }

    let mut tables = cli.load.iter();
    Ok((0..players)
        .map(|seat| {
            if seat == cli.seat {
                return AgentSpec::Human;
            }
            match tables.next() {
                Some(path) => AgentSpec::Q {
                    load: Some(path.clone()),
                    explore: false,
                },
                None => AgentSpec::Random { seed: None },
            }
        })
        .collect())
}
