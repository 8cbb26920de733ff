//! Running tallies of a training run.

use serde::{Deserialize, Serialize};

use crate::game::MessageKind;

/// Statistics tracked during training.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Episodes played so far.
    pub episodes: u64,

    /// Wins per player.
    pub wins: Vec<u64>,

    /// Losses per player.
    pub losses: Vec<u64>,

    /// Episodes that ended with a full board.
    pub draws: u64,

    /// Episodes that ended with a claim on an occupied cell.
    pub forfeits: u64,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Episodes per second.
    pub episodes_per_second: f64,
}

impl TrainingStats {
    /// Create empty stats for `players` players.
    pub fn new(players: usize) -> Self {
        Self {
            wins: vec![0; players],
            losses: vec![0; players],
            ..Default::default()
        }
    }

    /// Count one finished episode from the last message each player received.
    ///
    /// A draw message anywhere makes the episode a draw. Otherwise wins and
    /// losses are counted per player, and a collision counts as a forfeit.
    pub fn record(&mut self, messages: &[MessageKind]) {
        self.episodes += 1;

        if messages.contains(&MessageKind::Draw) {
            self.draws += 1;
            return;
        }
        if messages.contains(&MessageKind::Collision) {
            self.forfeits += 1;
        }
        if self.wins.len() < messages.len() {
            self.wins.resize(messages.len(), 0);
            self.losses.resize(messages.len(), 0);
        }
        for (player, message) in messages.iter().enumerate() {
            match message {
                MessageKind::Win => self.wins[player] += 1,
                MessageKind::Lose => self.losses[player] += 1,
                _ => {}
            }
        }
    }

    /// Update episodes per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.episodes_per_second = self.episodes as f64 / self.elapsed_seconds;
        }
    }

    /// Share of episodes `player` has won.
    pub fn win_rate(&self, player: usize) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.wins.get(player).copied().unwrap_or(0) as f64 / self.episodes as f64
    }

    /// Number of players tracked.
    pub fn players(&self) -> usize {
        self.wins.len()
    }
}
