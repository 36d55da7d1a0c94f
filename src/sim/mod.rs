//! Grid engine and session state
//!
//! All move logic lives here. This module is pure and synchronous:
//! - Boards are plain `Copy` values
//! - Randomness only through a caller-supplied RNG
//! - No storage or platform dependencies

pub mod board;
pub mod history;
pub mod line;
pub mod moves;
pub mod spawn;
pub mod state;

pub use board::{Board, Direction, Line, Position};
pub use history::{Snapshot, UndoHistory};
pub use line::{LineResolution, compress, resolve_line};
pub use moves::{MoveOutcome, apply_move, has_moves_available};
pub use spawn::{spawn_count, spawn_tiles};
pub use state::{GameState, MoveResult, RngState};
