//! Messages and rewards the engine hands back after every action.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened to the player who just acted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// The player completed a winning run.
    Win,
    /// Another player won.
    Lose,
    /// The board filled up without a winner.
    Draw,
    /// The move was legal and the game goes on.
    Step,
    /// The player tried to claim an occupied cell and forfeited the game.
    Collision,
    /// Some other player forfeited by claiming an occupied cell.
    OtherCollided,
}

impl MessageKind {
    /// Every kind, in declaration order.
    pub const ALL: [MessageKind; 6] = [
        MessageKind::Win,
        MessageKind::Lose,
        MessageKind::Draw,
        MessageKind::Step,
        MessageKind::Collision,
        MessageKind::OtherCollided,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Win => "You won!",
            MessageKind::Lose => "You lost!",
            MessageKind::Draw => "Draw",
            MessageKind::Step => "You made your move",
            MessageKind::Collision => "You placed a piece on an occupied cell",
            MessageKind::OtherCollided => "Someone placed a piece on an occupied cell",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reward paid out for each [`MessageKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// Paid to the winner.
    pub win: f64,
    /// Paid to every other player after a win.
    pub lose: f64,
    /// Paid to everybody after a draw.
    pub draw: f64,
    /// Paid for an ordinary move.
    pub step: f64,
    /// Paid to a player who claims an occupied cell.
    pub collision: f64,
    /// Paid to everybody else after a collision.
    pub other_collided: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            win: 10.0,
            lose: -10.0,
            draw: 0.0,
            step: -1.0,
            collision: -100.0,
            other_collided: 0.0,
        }
    }
}

impl Rewards {
    /// Reward attached to a message.
    pub fn for_message(&self, message: MessageKind) -> f64 {
        match message {
            MessageKind::Win => self.win,
            MessageKind::Lose => self.lose,
            MessageKind::Draw => self.draw,
            MessageKind::Step => self.step,
            MessageKind::Collision => self.collision,
            MessageKind::OtherCollided => self.other_collided,
        }
    }

    /// Check that every reward is a finite number.
    pub fn is_finite(&self) -> bool {
        MessageKind::ALL
            .iter()
            .all(|&m| self.for_message(m).is_finite())
    }
}
