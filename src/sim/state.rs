//! Session state and per-move results
//!
//! `GameState` is everything that must be persisted to resume a game.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, Position};
use super::history::Snapshot;

/// Result of one move attempt
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveResult {
    /// False means nothing changed and the session was not touched
    pub moved: bool,
    pub score_gained: u64,
    /// Cells filled by the post-move spawn (for highlighting)
    pub spawned: Vec<Position>,
    /// This move left no legal follow-up
    pub game_over: bool,
}

impl MoveResult {
    pub fn unmoved() -> Self {
        Self::default()
    }
}

/// RNG seed wrapper so a session can be replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Live session: board, score and terminal flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub score: u64,
    pub is_over: bool,
}

impl GameState {
    /// Empty board, zero score
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture board and score for undo
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            score: self.score,
        }
    }

    /// Return to a captured snapshot
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.board = snapshot.board;
        self.score = snapshot.score;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
