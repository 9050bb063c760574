//! The divisibility rule that prunes the solver's search.
//!
//! A partial path can only be extended into a cell whose value divides the
//! remaining target exactly. Anything else can never multiply back up to
//! the target, so the whole subtree below that cell is skipped.

use crate::error::{PuzzleError, Result};

/// Remaining target after the apex, or `None` when the apex does not
/// divide the target (no path can succeed).
pub fn start(target: u64, apex: u64) -> Result<Option<u64>> {
    if target == 0 {
        return Err(PuzzleError::invalid("the target must be a positive integer"));
    }
    descend(target, apex)
}

/// Remaining target after entering a cell holding `value`, or `None` when
/// `value` does not divide `remaining`.
pub fn descend(remaining: u64, value: u64) -> Result<Option<u64>> {
    match remaining.checked_rem(value) {
        Some(0) => Ok(Some(remaining / value)),
        Some(_) => Ok(None),
        None => Err(PuzzleError::invalid("the triangle contains a zero value")),
    }
}

/// A full path solves the puzzle when nothing is left to divide out.
pub fn is_solved(remaining: u64) -> bool {
    remaining == 1
}
