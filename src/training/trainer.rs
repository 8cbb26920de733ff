//! Episode driver.
//!
//! The trainer owns a [`GameEngine`] and one agent per seat and runs complete
//! episodes between them:
//!
//! ```text
//! reset ─▶ for each seat not yet done:
//!              action ─▶ engine.action ─▶ fit
//!          until every seat has seen done
//!       ─▶ decay(episode) on every agent
//! ```
//!
//! A seat is done once the engine has returned `done` to it, so every player
//! observes its own terminal reward before the episode ends.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::error::{Error, Result};
use crate::game::{Board, GameConfig, GameEngine, MessageKind, Outcome};
use crate::training::stats::TrainingStats;

/// Settings of a training run.
///
/// # Example
/// ```
/// use kinarow::training::TrainerConfig;
///
/// let config = TrainerConfig::default().with_episodes(50_000);
/// assert_eq!(config.report_interval, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of episodes to play.
    pub episodes: u64,

    /// Log running totals every this many episodes. 0 disables reports.
    pub report_interval: u64,

    /// Log the final board of a decided game every this many episodes.
    /// 0 disables board dumps.
    pub board_dump_interval: u64,

    /// Save every agent every this many episodes. 0 disables checkpoints.
    pub checkpoint_interval: u64,

    /// Directory for checkpoints. `None` disables them.
    pub checkpoint_dir: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 1_000_000,
            report_interval: 10_000,
            board_dump_interval: 20_000,
            checkpoint_interval: 100_000,
            checkpoint_dir: Some(PathBuf::from("dumps")),
        }
    }
}

impl TrainerConfig {
    /// Short run with no periodic output, for tests and quick experiments.
    pub fn quick(episodes: u64) -> Self {
        Self {
            episodes,
            report_interval: 0,
            board_dump_interval: 0,
            checkpoint_interval: 0,
            checkpoint_dir: None,
        }
    }

    /// Builder method: set the number of episodes.
    pub fn with_episodes(mut self, episodes: u64) -> Self {
        self.episodes = episodes;
        self
    }

    /// Builder method: set the checkpoint directory.
    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = Some(dir.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::config("episodes must be > 0"));
        }
        Ok(())
    }
}

/// What happened in one episode.
#[derive(Debug, Clone)]
pub struct EpisodeResult {
    /// 1-based episode number.
    pub episode: u64,

    /// Last message each player received.
    pub messages: Vec<MessageKind>,

    /// Sum of rewards each player received.
    pub returns: Vec<f64>,

    /// How the game ended.
    pub outcome: Option<Outcome>,

    /// Final board.
    pub board: Board,
}

impl EpisodeResult {
    /// True if the game ended in a win or a draw rather than a forfeit.
    pub fn is_decided(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Win(_)) | Some(Outcome::Draw))
    }
}

/// Runs episodes between a fixed set of agents.
///
/// # Type Parameters
/// - `A`: The agent type; use `Box<dyn Agent>` to mix kinds
///
/// # Example
/// ```
/// use kinarow::agent::{QAgent, QConfig};
/// use kinarow::game::{GameConfig, GameEngine};
/// use kinarow::training::{Trainer, TrainerConfig};
///
/// let engine = GameEngine::new(GameConfig::tic_tac_toe()).unwrap();
/// let agents = (0..2)
///     .map(|seed| QAgent::new(3, 3, QConfig::for_episodes(100).with_seed(seed)).unwrap())
///     .collect();
///
/// let mut trainer = Trainer::new(TrainerConfig::quick(100), engine, agents).unwrap();
/// let stats = trainer.train().unwrap();
/// assert_eq!(stats.episodes, 100);
/// ```
pub struct Trainer<A: Agent> {
    /// Run settings.
    config: TrainerConfig,

    /// The game being played.
    engine: GameEngine,

    /// One agent per seat, in turn order.
    agents: Vec<A>,

    /// Episodes completed.
    episode: u64,

    /// Statistics tracking.
    stats: TrainingStats,
}

impl<A: Agent> Trainer<A> {
    /// Create a trainer.
    ///
    /// Fails with `InvalidConfiguration` unless there is exactly one agent
    /// per player.
    pub fn new(config: TrainerConfig, engine: GameEngine, agents: Vec<A>) -> Result<Self> {
        config.validate()?;
        let players = engine.config().players;
        if agents.len() != players {
            return Err(Error::config(format!(
                "expected {} agents, one per player, got {}",
                players,
                agents.len()
            )));
        }

        Ok(Self {
            config,
            engine,
            agents,
            episode: 0,
            stats: TrainingStats::new(players),
        })
    }

    /// Play one complete episode and run every agent's end-of-episode hook.
    pub fn play_episode(&mut self) -> Result<EpisodeResult> {
        self.episode += 1;
        let players = self.agents.len();
        let mut done = vec![false; players];
        let mut messages = vec![MessageKind::Step; players];
        let mut returns = vec![0.0; players];

        let mut state = self.engine.reset();
        while done.iter().any(|&d| !d) {
            for (seat, agent) in self.agents.iter_mut().enumerate() {
                if done[seat] {
                    continue;
                }
                let action = agent.action(&state)?;
                let transition = self.engine.action(action)?;
                agent.fit(&state, &transition.state, action, transition.reward);

                done[seat] = transition.done;
                messages[seat] = transition.message;
                returns[seat] += transition.reward;
                state = transition.state;
            }
        }

        for agent in self.agents.iter_mut() {
            agent.decay(self.episode);
        }
        self.stats.record(&messages);

        let result = EpisodeResult {
            episode: self.episode,
            messages,
            returns,
            outcome: self.engine.outcome(),
            board: self.engine.board().clone(),
        };
        debug!(episode = result.episode, outcome = ?result.outcome, "episode finished");
        Ok(result)
    }

    /// Play `config.episodes` episodes.
    ///
    /// # Returns
    /// Statistics from the training run.
    pub fn train(&mut self) -> Result<&TrainingStats> {
        self.train_with_callback(0, |_| {})
    }

    /// Train with a callback for progress tracking.
    ///
    /// Besides the callback this logs reports, dumps boards and writes
    /// checkpoints at the intervals in the [`TrainerConfig`].
    ///
    /// # Arguments
    /// * `callback_interval` - How often to call the callback, 0 for never
    /// * `callback` - Function called every `callback_interval` episodes
    pub fn train_with_callback<F>(
        &mut self,
        callback_interval: u64,
        mut callback: F,
    ) -> Result<&TrainingStats>
    where
        F: FnMut(&TrainingStats),
    {
        let start_time = Instant::now();
        let first = self.episode;

        for _ in 0..self.config.episodes {
            let result = self.play_episode()?;
            let run_episode = result.episode - first;

            if every(self.config.report_interval, run_episode) {
                self.report();
            }

            if every(self.config.board_dump_interval, run_episode) && result.is_decided() {
                info!(
                    episode = result.episode,
                    "final board:\n{}",
                    result.board
                );
            }

            if every(self.config.checkpoint_interval, run_episode) {
                self.checkpoint()?;
            }

            if every(callback_interval, run_episode) {
                self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
                self.stats.update_rate();
                callback(&self.stats);
            }
        }

        // Final stats update
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();

        Ok(&self.stats)
    }

    fn report(&self) {
        info!(episode = self.episode, "training report");
        for player in 0..self.stats.players() {
            info!(
                player,
                wins = self.stats.wins[player],
                losses = self.stats.losses[player],
                "  totals"
            );
        }
        info!(
            draws = self.stats.draws,
            forfeits = self.stats.forfeits,
            "  totals"
        );
    }

    /// Save every agent into the checkpoint directory.
    ///
    /// Does nothing when no directory is configured. Each save replaces the
    /// previous checkpoint of the same agent.
    pub fn checkpoint(&self) -> Result<()> {
        let Some(dir) = &self.config.checkpoint_dir else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)?;
        for (player, agent) in self.agents.iter().enumerate() {
            agent.save(&checkpoint_path(dir, player, self.engine.config()))?;
        }
        info!(episode = self.episode, dir = %dir.display(), "checkpoint written");
        Ok(())
    }

    /// Episodes completed.
    pub fn episode(&self) -> u64 {
        self.episode
    }

    /// Statistics so far.
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// The run settings.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// The agents, in turn order.
    pub fn agents(&self) -> &[A] {
        &self.agents
    }

    /// Consume the trainer, returning its agents.
    pub fn into_agents(self) -> Vec<A> {
        self.agents
    }
}

fn every(interval: u64, episode: u64) -> bool {
    interval > 0 && episode % interval == 0
}

/// File an agent's checkpoint is written to:
/// `dir/Player{player}-{players}-{rows}x{cols}-{win_length}-last.json`.
pub fn checkpoint_path(dir: &Path, player: usize, game: &GameConfig) -> PathBuf {
    dir.join(format!(
        "Player{}-{}-{}x{}-{}-last.json",
        player, game.players, game.rows, game.cols, game.win_length
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{QAgent, QConfig, RandomAgent};
    use crate::error::Result;
    use crate::game::State;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Plays a fixed sequence of cells, then cell 0 forever.
    struct Scripted {
        moves: Vec<usize>,
        fits: Vec<(usize, f64)>,
        decays: Vec<u64>,
    }

    impl Scripted {
        fn new(moves: &[usize]) -> Self {
            Self {
                moves: moves.iter().rev().copied().collect(),
                fits: Vec::new(),
                decays: Vec::new(),
            }
        }
    }

    impl Agent for Scripted {
        fn action(&mut self, _state: &State) -> Result<usize> {
            Ok(self.moves.pop().unwrap_or(0))
        }

        fn fit(&mut self, _state: &State, _next: &State, action: usize, reward: f64) {
            self.fits.push((action, reward));
        }

        fn decay(&mut self, episode: u64) {
            self.decays.push(episode);
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn count(&self, needle: &str) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .matches(needle)
                .count()
        }
    }

    /// Run `f` with info-level logs going to a fresh capture.
    fn logged<T>(f: impl FnOnce() -> T) -> (T, Capture) {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, capture)
    }

    fn engine(players: usize) -> GameEngine {
        GameEngine::new(GameConfig::default().with_players(players)).unwrap()
    }

    #[test]
    fn test_agent_count_must_match_players() {
        let agents = vec![RandomAgent::new(Some(1))];
        assert!(matches!(
            Trainer::new(TrainerConfig::quick(1), engine(2), agents),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_episodes_rejected() {
        let agents = vec![RandomAgent::new(Some(1)), RandomAgent::new(Some(2))];
        assert!(Trainer::new(TrainerConfig::quick(0), engine(2), agents).is_err());
    }

    #[test]
    fn test_every_player_observes_the_win() {
        // player 0 takes the top row
        let agents = vec![Scripted::new(&[0, 1, 2]), Scripted::new(&[3, 4])];
        let mut trainer = Trainer::new(TrainerConfig::quick(1), engine(2), agents).unwrap();

        let result = trainer.play_episode().unwrap();
        assert_eq!(result.messages, vec![MessageKind::Win, MessageKind::Lose]);
        assert_eq!(result.returns, vec![-1.0 - 1.0 + 10.0, -1.0 - 1.0 - 10.0]);
        assert_eq!(result.outcome, Some(Outcome::Win(0)));
        assert!(result.is_decided());

        let agents = trainer.agents();
        assert_eq!(agents[0].fits, vec![(0, -1.0), (1, -1.0), (2, 10.0)]);
        // the loser's last call is a terminal replay of its default move
        assert_eq!(agents[1].fits, vec![(3, -1.0), (4, -1.0), (0, -10.0)]);
        assert_eq!(agents[0].decays, vec![1]);
        assert_eq!(agents[1].decays, vec![1]);
    }

    #[test]
    fn test_forfeit_reaches_everyone() {
        let agents = vec![
            Scripted::new(&[4]),
            Scripted::new(&[4]),
            Scripted::new(&[8]),
        ];
        let mut trainer = Trainer::new(TrainerConfig::quick(1), engine(3), agents).unwrap();

        let result = trainer.play_episode().unwrap();
        assert_eq!(
            result.messages,
            vec![
                MessageKind::OtherCollided,
                MessageKind::Collision,
                MessageKind::OtherCollided,
            ]
        );
        assert_eq!(result.outcome, Some(Outcome::Forfeit(1)));
        assert!(!result.is_decided());
        assert_eq!(trainer.stats().forfeits, 1);
    }

    #[test]
    fn test_train_counts_episodes() {
        let agents = vec![RandomAgent::new(Some(1)), RandomAgent::new(Some(2))];
        let mut trainer = Trainer::new(TrainerConfig::quick(200), engine(2), agents).unwrap();

        let mut calls = 0;
        let stats = trainer.train_with_callback(50, |_| calls += 1).unwrap();
        assert_eq!(stats.episodes, 200);
        let decided: u64 = stats.wins.iter().sum::<u64>() + stats.draws;
        // random agents never pick an occupied cell, so no game is forfeited
        assert_eq!(stats.forfeits, 0);
        assert_eq!(decided, 200);
        assert_eq!(calls, 4);
        assert_eq!(trainer.episode(), 200);
    }

    #[test]
    fn test_report_and_board_dump_intervals() {
        let agents = vec![RandomAgent::new(Some(1)), RandomAgent::new(Some(2))];
        let config = TrainerConfig {
            report_interval: 25,
            board_dump_interval: 40,
            ..TrainerConfig::quick(100)
        };
        let mut trainer = Trainer::new(config, engine(2), agents).unwrap();

        let (episodes, log) = logged(|| trainer.train().unwrap().episodes);
        assert_eq!(episodes, 100);
        assert_eq!(log.count("training report"), 4);
        // random agents never forfeit, so every dumped game is decided
        assert_eq!(log.count("final board"), 2);
    }

    #[test]
    fn test_board_dump_skips_forfeits() {
        // both seats always play cell 0, so the second one collides
        let agents = vec![Scripted::new(&[]), Scripted::new(&[])];
        let config = TrainerConfig {
            board_dump_interval: 1,
            ..TrainerConfig::quick(10)
        };
        let mut trainer = Trainer::new(config, engine(2), agents).unwrap();

        let (forfeits, log) = logged(|| trainer.train().unwrap().forfeits);
        assert_eq!(forfeits, 10);
        assert_eq!(log.count("final board"), 0);
        assert_eq!(log.count("training report"), 0);
    }

    #[test]
    fn test_q_agents_learn_states() {
        let agents: Vec<QAgent> = (0..2)
            .map(|seed| QAgent::new(3, 3, QConfig::for_episodes(300).with_seed(seed)).unwrap())
            .collect();
        let mut trainer = Trainer::new(TrainerConfig::quick(300), engine(2), agents).unwrap();
        trainer.train().unwrap();

        let agents = trainer.into_agents();
        assert!(agents.iter().all(|a| a.table().len() > 10));
        // the decay window closed at episode 150
        assert!(agents.iter().all(|a| a.epsilon() == 0.0));
    }

    #[test]
    fn test_checkpoint_path() {
        let game = GameConfig::new(2, 4, 4, 4);
        assert_eq!(
            checkpoint_path(Path::new("dumps"), 1, &game),
            PathBuf::from("dumps/Player1-2-4x4-4-last.json")
        );
    }
}
