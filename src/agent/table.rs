//! Storage for learned action values.
//!
//! A [`QTable`] maps every visited [`State`] to one value per board cell.
//! Rows are created on first lookup, so the table only ever holds states the
//! agent has actually seen.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::game::{cell_count, Cell, State};

/// Version written into every persisted table.
pub const TABLE_FORMAT_VERSION: u32 = 1;

/// Sparse state -> action-value mapping for one board shape.
#[derive(Debug, Clone)]
pub struct QTable {
    rows: usize,
    cols: usize,

    /// state -> [value per cell]
    values: FxHashMap<State, Vec<f64>>,
}

impl QTable {
    /// Create an empty table for a `rows x cols` board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: FxHashMap::default(),
        }
    }

    /// Create an empty table with room for `capacity` states.
    pub fn with_capacity(rows: usize, cols: usize, capacity: usize) -> Self {
        Self {
            rows,
            cols,
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Board height this table was built for.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Board width this table was built for.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of values per row.
    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Get the row for `state`, materializing it on first access.
    ///
    /// A fresh row holds an independent draw from `[0, 1)` per cell, except
    /// that cells already occupied in `state` get `f64::MIN` so they can never
    /// be the argmax.
    ///
    /// # Arguments
    /// * `state` - Lookup key; must have one cell per table slot
    /// * `rng` - Source for the initial values
    pub fn get_or_insert<R: Rng>(&mut self, state: &State, rng: &mut R) -> &mut Vec<f64> {
        let cells = self.cells();
        self.values.entry(state.clone()).or_insert_with(|| {
            let mut row: Vec<f64> = (0..cells).map(|_| rng.gen::<f64>()).collect();
            for (slot, cell) in row.iter_mut().zip(state.cells()) {
                if !cell.is_empty() {
                    *slot = f64::MIN;
                }
            }
            row
        })
    }

    /// Get the row for `state` without creating it.
    pub fn get(&self, state: &State) -> Option<&[f64]> {
        self.values.get(state).map(Vec::as_slice)
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no state has been visited.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Highest player index found in any stored state, `None` if no state
    /// holds a piece.
    ///
    /// [`QTable::import`] only checks the board shape; a caller that knows the
    /// player count compares it against this.
    pub fn highest_player(&self) -> Option<u8> {
        self.values
            .keys()
            .flat_map(|state| state.cells().iter())
            .filter_map(|cell| match cell {
                Cell::Player(p) => Some(*p),
                Cell::Empty => None,
            })
            .max()
    }

    /// Rough heap usage in bytes.
    pub fn memory_usage(&self) -> usize {
        let cell = std::mem::size_of::<Cell>();
        let value = std::mem::size_of::<f64>();
        self.values
            .iter()
            .map(|(k, v)| k.len() * cell + v.len() * value)
            .sum()
    }

    /// Export to the serializable format.
    pub fn export(&self) -> TableExport {
        TableExport {
            version: TABLE_FORMAT_VERSION,
            rows: self.rows,
            cols: self.cols,
            entries: self
                .values
                .iter()
                .map(|(state, values)| TableEntry {
                    state: state.clone(),
                    values: values.clone(),
                })
                .collect(),
        }
    }

    /// Build a table for a `rows x cols` board from exported data.
    ///
    /// The embedded shape and every entry must match the requested board;
    /// nothing is truncated or padded. Player indices inside the states are
    /// not checked, see [`QTable::highest_player`].
    pub fn import(rows: usize, cols: usize, data: TableExport) -> Result<Self> {
        if data.version != TABLE_FORMAT_VERSION {
            return Err(Error::IncompatibleShape {
                expected: format!("format version {}", TABLE_FORMAT_VERSION),
                found: format!("format version {}", data.version),
            });
        }
        if (data.rows, data.cols) != (rows, cols) {
            return Err(Error::IncompatibleShape {
                expected: format!("{}x{} board", rows, cols),
                found: format!("{}x{} board", data.rows, data.cols),
            });
        }

        let cells = cell_count(rows, cols)?;
        let mut table = Self::with_capacity(rows, cols, data.entries.len());
        for entry in data.entries {
            if entry.state.len() != cells || entry.values.len() != cells {
                return Err(Error::IncompatibleShape {
                    expected: format!("{} cells per entry", cells),
                    found: format!(
                        "state of {} cells with {} values",
                        entry.state.len(),
                        entry.values.len()
                    ),
                });
            }
            table.values.insert(entry.state, entry.values);
        }
        Ok(table)
    }

    /// Write the table as JSON.
    ///
    /// The data goes to a sibling `.tmp` file first and is renamed over
    /// `path` once complete.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = temp_path(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &self.export())?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        debug!(
            path = %path.display(),
            states = self.len(),
            bytes = self.memory_usage(),
            "saved q-table"
        );
        Ok(())
    }

    /// Read a table written by [`QTable::save`] for a `rows x cols` board.
    pub fn load(path: &Path, rows: usize, cols: usize) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let data: TableExport = serde_json::from_reader(reader)?;
        let table = Self::import(rows, cols, data)?;
        debug!(path = %path.display(), states = table.len(), "loaded q-table");
        Ok(table)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serializable export format for a [`QTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableExport {
    /// Format version, currently always [`TABLE_FORMAT_VERSION`]
    pub version: u32,
    /// Board height
    pub rows: usize,
    /// Board width
    pub cols: usize,
    /// One entry per visited state
    pub entries: Vec<TableEntry>,
}

/// One row of an exported table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Board snapshot, `-1` for empty cells
    pub state: State,
    /// Action value per cell
    pub values: Vec<f64>,
}
