//! Board representation, state snapshots and line geometry.
//!
//! The board is a flat, row-major sequence of `rows * cols` cells. Every
//! geometric query works on cell indices and returns the cells of one line in
//! board order, so run detection is a sliding window over a plain slice.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest number of players a [`Cell`] can tell apart.
pub const MAX_PLAYERS: usize = u8::MAX as usize + 1;

/// Largest number of cells a board may have.
pub const MAX_CELLS: usize = 1 << 16;

/// Number of cells on a `rows x cols` board.
///
/// Fails with [`Error::InvalidConfiguration`] if either dimension is zero or
/// the board would hold more than [`MAX_CELLS`] cells.
pub fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    match rows.checked_mul(cols) {
        Some(cells) if cells > 0 && cells <= MAX_CELLS => Ok(cells),
        _ => Err(Error::config(format!(
            "board must have between 1 and {} cells, got {}x{}",
            MAX_CELLS, rows, cols
        ))),
    }
}

/// Occupancy of a single cell.
///
/// Serialized as an integer: `-1` for an empty cell, the player index otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum Cell {
    /// Nobody has claimed the cell yet.
    Empty,
    /// Claimed by the player with this index.
    Player(u8),
}

impl Cell {
    /// Check whether the cell is unclaimed.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Integer encoding used for display and persistence.
    pub fn code(self) -> i16 {
        match self {
            Cell::Empty => -1,
            Cell::Player(p) => p as i16,
        }
    }
}

impl From<Cell> for i16 {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

impl TryFrom<i16> for Cell {
    type Error = String;

    fn try_from(code: i16) -> std::result::Result<Self, Self::Error> {
        match code {
            -1 => Ok(Cell::Empty),
            0..=255 => Ok(Cell::Player(code as u8)),
            other => Err(format!("invalid cell code {}", other)),
        }
    }
}

/// Immutable snapshot of every cell on a board.
///
/// States are the lookup keys of the Q-table, so they hash and compare by
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Vec<Cell>);

impl State {
    /// Cells in board order.
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-cell snapshot (never produced by a [`Board`]).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the cells as a grid with `cols` cells per line.
    pub fn grid(&self, cols: usize) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = write_grid(&mut out, &self.0, cols.max(1));
        out
    }

    /// Indices of every unclaimed cell, ascending.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| i)
            .collect()
    }
}

impl From<Vec<Cell>> for State {
    fn from(cells: Vec<Cell>) -> Self {
        State(cells)
    }
}

/// A `rows x cols` grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if either dimension is zero
    /// or the board is larger than [`MAX_CELLS`].
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let cells = cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; cells],
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: boards have at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Clear every cell. Dimensions are unchanged.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(Error::InvalidAction {
                index,
                cells: self.cells.len(),
            })
        }
    }

    /// Convert a cell index to `(row, col)`.
    pub fn coords(&self, index: usize) -> Result<(usize, usize)> {
        self.check(index)?;
        Ok((index / self.cols, index % self.cols))
    }

    /// Convert `(row, col)` to a cell index.
    pub fn index_of(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::InvalidAction {
                index: row.saturating_mul(self.cols).saturating_add(col),
                cells: self.cells.len(),
            });
        }
        Ok(row * self.cols + col)
    }

    /// Value of a cell.
    pub fn get(&self, index: usize) -> Result<Cell> {
        self.check(index)?;
        Ok(self.cells[index])
    }

    /// Claim a cell for `player`.
    ///
    /// Returns `Ok(false)` and leaves the board untouched if the cell is
    /// already taken.
    pub fn set(&mut self, index: usize, player: u8) -> Result<bool> {
        self.check(index)?;
        if !self.cells[index].is_empty() {
            return Ok(false);
        }
        self.cells[index] = Cell::Player(player);
        Ok(true)
    }

    /// Cells of the row containing `index`, left to right.
    pub fn row(&self, index: usize) -> Result<Vec<Cell>> {
        let (row, _) = self.coords(index)?;
        let start = row * self.cols;
        Ok(self.cells[start..start + self.cols].to_vec())
    }

    /// Cells of the column containing `index`, top to bottom.
    pub fn column(&self, index: usize) -> Result<Vec<Cell>> {
        let (_, col) = self.coords(index)?;
        Ok(self.cells.iter().skip(col).step_by(self.cols).copied().collect())
    }

    /// Cells of a diagonal through `index`, top to bottom.
    ///
    /// `anti == false` selects the "\" diagonal, `anti == true` the "/" one.
    /// The walk first climbs to the top edge of the diagonal, then steps down
    /// one row at a time and stops as soon as the column leaves the board.
    pub fn diagonal(&self, index: usize, anti: bool) -> Result<Vec<Cell>> {
        let (row, col) = self.coords(index)?;
        let rows = self.rows as isize;
        let cols = self.cols as isize;
        let step: isize = if anti { 1 } else { -1 };

        let (mut r, mut c) = (row as isize, col as isize);
        while r > 0 && (0..cols).contains(&(c + step)) {
            r -= 1;
            c += step;
        }

        let mut line = Vec::with_capacity(self.rows.min(self.cols));
        while r < rows && (0..cols).contains(&c) {
            line.push(self.cells[self.index_of(r as usize, c as usize)?]);
            r += 1;
            c -= step;
        }
        Ok(line)
    }

    /// Check whether any line through `index` holds `run` equal, claimed cells
    /// in a row.
    pub fn has_run_through(&self, index: usize, run: usize) -> Result<bool> {
        Ok(contains_run(&self.row(index)?, run)
            || contains_run(&self.column(index)?, run)
            || contains_run(&self.diagonal(index, false)?, run)
            || contains_run(&self.diagonal(index, true)?, run))
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Snapshot of the current cells.
    pub fn state(&self) -> State {
        State(self.cells.clone())
    }
}

fn contains_run(line: &[Cell], run: usize) -> bool {
    if run == 0 {
        return false;
    }
    line.windows(run)
        .any(|w| !w[0].is_empty() && w.iter().all(|&cell| cell == w[0]))
}

fn write_grid(out: &mut impl fmt::Write, cells: &[Cell], cols: usize) -> fmt::Result {
    for (r, row) in cells.chunks(cols).enumerate() {
        if r > 0 {
            writeln!(out)?;
        }
        let line: Vec<String> = row.iter().map(|c| format!("{:3}", c.code())).collect();
        write!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, &self.cells, self.cols)
    }
}
