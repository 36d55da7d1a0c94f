//! Line resolution: the merge primitive every move is built from
//!
//! A line is resolved toward index 0 ("left"). Callers reverse the line
//! to resolve toward the other end.
//!
//! Each tile merges at most once per move. `[2, 2, 2, 2]` becomes
//! `[4, 4, 0, 0]`, never `[8, 0, 0, 0]`.

use super::board::Line;
use crate::consts::SIZE;

/// Result of resolving one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineResolution {
    pub line: Line,
    /// Sum of all merged tile values
    pub gained: u64,
}

/// Left-pack non-zero values, padding with zeros
pub fn compress(line: Line) -> Line {
    let mut out = [0; SIZE];
    for (slot, value) in out.iter_mut().zip(line.into_iter().filter(|&v| v != 0)) {
        *slot = value;
    }
    out
}

/// Compress then merge equal neighbours in a single left-to-right scan
pub fn resolve_line(line: Line) -> LineResolution {
    let packed = compress(line);
    let mut out = [0; SIZE];
    let mut gained = 0u64;
    let mut write = 0;
    let mut read = 0;

    while read < SIZE && packed[read] != 0 {
        let value = packed[read];
        if read + 1 < SIZE && packed[read + 1] == value {
            let merged = value * 2;
            out[write] = merged;
            gained += merged as u64;
            // Skip the partner so the merged tile can't merge again
            read += 2;
        } else {
            out[write] = value;
            read += 1;
        }
        write += 1;
    }

    LineResolution { line: out, gained }
}
