//! A human at a terminal.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use tracing::warn;

use crate::agent::Agent;
use crate::error::Result;
use crate::game::State;

const PROMPT: &str = "Choose a cell for your piece: ";
const BANNER: &str = "---------------";

/// Agent that shows the board on `output` and reads cell indices from `input`.
///
/// Lines that are not a cell index of the board are rejected and the prompt is
/// repeated. Occupied cells are accepted; claiming one forfeits the game like it
/// would for any other player.
pub struct HumanAgent<R, W> {
    cols: usize,
    input: R,
    output: W,
}

impl HumanAgent<StdinLock<'static>, Stdout> {
    /// Human reading from stdin and writing to stdout.
    pub fn stdio(cols: usize) -> Self {
        Self::new(cols, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    /// Create a human agent for a board `cols` cells wide.
    pub fn new(cols: usize, input: R, output: W) -> Self {
        Self {
            cols,
            input,
            output,
        }
    }

    /// Consume the agent, returning its reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_index(&mut self, cells: usize) -> Result<usize> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
            }
            match line.trim().parse::<usize>() {
                Ok(index) if index < cells => return Ok(index),
                _ => writeln!(
                    self.output,
                    "Enter a cell number from 0 to {}",
                    cells.saturating_sub(1)
                )?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn action(&mut self, state: &State) -> Result<usize> {
        writeln!(self.output, "{}", state.grid(self.cols))?;
        self.read_index(state.len())
    }

    fn decay(&mut self, _episode: u64) {
        let result = writeln!(self.output, "{}\nGame over\n{}", BANNER, BANNER)
            .and_then(|_| self.output.flush());
        if let Err(err) = result {
            warn!(%err, "could not write end-of-game banner");
        }
    }

    fn name(&self) -> &str {
        "human"
    }
}
