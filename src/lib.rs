//! Tile Merge - a sliding-tile merge puzzle core
//!
//! Core modules:
//! - `sim`: Grid engine (line resolution, moves, spawning) and session state
//! - `game`: Session orchestration (move → spawn → terminal check → history)
//! - `leaderboard`: Top-10 score records
//! - `persistence`: Key-value storage backends and record codecs
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Storage keys, seeding and data location

pub mod game;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::Game;
pub use leaderboard::{Leaderboard, LeaderboardRecord};
pub use persistence::{KeyValueStore, MemoryStore, StorageError};
pub use settings::Settings;
pub use sim::{Board, Direction, GameState, MoveResult, Position};

/// Game configuration constants
pub mod consts {
    /// Board edge length (the board is SIZE x SIZE)
    pub const SIZE: usize = 4;

    /// Largest tile reachable on a SIZE x SIZE board
    pub const MAX_TILE: u32 = 1 << 17;

    /// Maximum undo depth kept in memory
    pub const HISTORY_DEPTH: usize = 20;

    /// Leaderboard capacity
    pub const MAX_LEADERBOARD: usize = 10;
    /// Longest player name kept on the leaderboard (in chars)
    pub const MAX_NAME_LEN: usize = 20;
    /// Name recorded when the player leaves the field blank
    pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

    /// Probability that a spawned tile is a 2 (otherwise 4)
    pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;
    /// Tiles spawned after each successful move (inclusive range)
    pub const MOVE_SPAWN_MIN: usize = 1;
    pub const MOVE_SPAWN_MAX: usize = 2;
    /// Tiles spawned on a fresh board (inclusive range)
    pub const NEW_GAME_SPAWN_MIN: usize = 1;
    pub const NEW_GAME_SPAWN_MAX: usize = 3;

    /// Default storage keys
    pub const SESSION_KEY: &str = "gameState2048";
    pub const LEADERBOARD_KEY: &str = "leaderboard2048";
}
