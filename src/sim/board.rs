//! Board geometry: the N x N tile matrix, positions and move directions
//!
//! Coordinates are (row, col) with row 0 at the top and col 0 at the left.
//! A cell holds 0 (empty) or a power of two >= 2.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TILE, SIZE};

/// One row or column of the board, the unit of merge resolution
pub type Line = [u32; SIZE];

/// A cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Whether lines run along rows (Left/Right) rather than columns
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Whether lines must be reversed to project onto the leftward primitive
    #[inline]
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

/// The tile matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Line; SIZE],
}

impl Board {
    /// Create an all-empty board
    pub fn empty() -> Self {
        Self {
            cells: [[0; SIZE]; SIZE],
        }
    }

    pub fn from_rows(cells: [Line; SIZE]) -> Self {
        Self { cells }
    }

    /// Get the value at a position (None if out of bounds)
    pub fn get(&self, pos: Position) -> Option<u32> {
        self.cells.get(pos.row).and_then(|r| r.get(pos.col)).copied()
    }

    /// Set the value at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Position, value: u32) -> bool {
        match self.cells.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[Line; SIZE] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> Line {
        self.cells[row]
    }

    pub fn set_row(&mut self, row: usize, line: Line) {
        self.cells[row] = line;
    }

    pub fn column(&self, col: usize) -> Line {
        std::array::from_fn(|row| self.cells[row][col])
    }

    pub fn set_column(&mut self, col: usize, line: Line) {
        for (row, value) in line.into_iter().enumerate() {
            self.cells[row][col] = value;
        }
    }

    /// All empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Position> {
        let mut out = Vec::new();
        for (row, line) in self.cells.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value == 0 {
                    out.push(Position::new(row, col));
                }
            }
        }
        out
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v != 0)
    }

    /// Largest tile on the board (0 when empty)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tiles (conserved by moves)
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| v as u64).sum()
    }

    /// Every cell is either empty or a power of two in 2..=MAX_TILE
    ///
    /// The cap keeps merges of loaded boards from overflowing.
    pub fn is_well_formed(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|&v| v == 0 || (v >= 2 && v <= MAX_TILE && v.is_power_of_two()))
    }

    /// Build a board from nested rows, rejecting anything that isn't N x N
    /// or holds a value that can't be a tile
    pub fn from_nested(rows: &[Vec<u32>]) -> Option<Self> {
        if rows.len() != SIZE || rows.iter().any(|r| r.len() != SIZE) {
            return None;
        }
        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            board.cells[row].copy_from_slice(line);
        }
        board.is_well_formed().then_some(board)
    }

    pub fn to_nested(&self) -> Vec<Vec<u32>> {
        self.cells.iter().map(|r| r.to_vec()).collect()
    }

    /// Row-major flat copy (for the web boundary)
    pub fn to_flat(&self) -> Vec<u32> {
        self.cells.iter().flatten().copied().collect()
    }
}
