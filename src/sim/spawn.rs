//! Random tile spawning
//!
//! Spawns pick uniformly among empty cells without replacement. A new tile
//! is a 2 with probability `SPAWN_TWO_PROBABILITY`, otherwise a 4.

use rand::Rng;

use super::board::{Board, Position};
use crate::consts::SPAWN_TWO_PROBABILITY;

/// Fill up to `count` random empty cells
///
/// Returns the positions filled, in spawn order. Spawns fewer than `count`
/// tiles when the board doesn't have enough empty cells.
pub fn spawn_tiles<R: Rng + ?Sized>(board: &mut Board, count: usize, rng: &mut R) -> Vec<Position> {
    let mut pool = board.empty_cells();
    let target = count.min(pool.len());
    let mut spawned = Vec::with_capacity(target);

    for _ in 0..target {
        let idx = rng.random_range(0..pool.len());
        let pos = pool.remove(idx);
        let value = if rng.random_bool(SPAWN_TWO_PROBABILITY) { 2 } else { 4 };
        board.set(pos, value);
        spawned.push(pos);
    }

    spawned
}

/// Draw a spawn count from an inclusive range
pub fn spawn_count<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    rng.random_range(min..=max)
}
