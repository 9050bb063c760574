//! Depth-first backtracking solver.
//!
//! The search always tries the left child before the right one and only
//! enters a cell whose value divides the remaining target (see
//! [`crate::pruning`]). Backtracking unwinds an explicit stack of decision
//! points back to the most recent left move and retries that level going
//! right.

use std::time::{Duration, Instant};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{PuzzleError, Result};
use crate::pruning;
use crate::puzzle::{Move, Path, Triangle, INLINE_MOVES};

/// Counters collected while searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Cells entered below the apex
    pub nodes_entered: usize,
    /// Dead ends that forced a backtrack
    pub backtracks: usize,
    /// Wall-clock time spent searching
    pub elapsed: Duration,
}

/// One move taken by the search, with everything needed to resume from it.
#[derive(Debug, Clone, Copy)]
struct Decision {
    mv: Move,
    value: u64,
    column: usize,
    /// Target still to be divided out after entering this cell
    remaining: u64,
}

/// The current partial path.
///
/// The stack holds one decision per row entered below the apex, so its
/// length is the current depth and the top decision carries the column.
#[derive(Debug)]
struct SearchState {
    apex_remaining: u64,
    stack: SmallVec<[Decision; INLINE_MOVES]>,
}

impl SearchState {
    fn new(apex_remaining: u64) -> Self {
        Self {
            apex_remaining,
            stack: SmallVec::new(),
        }
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn column(&self) -> usize {
        self.stack.last().map_or(0, |d| d.column)
    }

    fn remaining(&self) -> u64 {
        self.stack.last().map_or(self.apex_remaining, |d| d.remaining)
    }

    fn path(&self) -> Path {
        self.stack.iter().map(|d| d.mv).collect()
    }

    /// Unwind past every trailing right move and then the left move below
    /// them. Returns `false` when no left move is left to retry.
    fn backtrack(&mut self) -> bool {
        while let Some(decision) = self.stack.pop() {
            trace!(
                mv = %decision.mv.symbol(),
                value = decision.value,
                depth = self.stack.len(),
                "undo"
            );
            if decision.mv == Move::Left {
                return true;
            }
        }
        false
    }
}

/// Find the first admissible child of the current cell, starting at
/// `first_choice`.
fn next_decision(
    triangle: &Triangle,
    state: &SearchState,
    first_choice: Move,
) -> Result<Option<Decision>> {
    let row = state.depth() + 1;
    for mv in [Move::Left, Move::Right] {
        if mv < first_choice {
            continue;
        }
        let column = state.column() + mv.offset();
        let value = triangle
            .get(row, column)
            .ok_or_else(|| PuzzleError::invalid(format!("no cell at row {} column {}", row, column)))?;
        if let Some(remaining) = pruning::descend(state.remaining(), value)? {
            return Ok(Some(Decision {
                mv,
                value,
                column,
                remaining,
            }));
        }
    }
    Ok(None)
}

/// Find the path whose product equals `target`.
///
/// When several paths qualify, the first one in left-before-right order is
/// returned.
pub fn solve(triangle: &Triangle, target: u64) -> Result<Path> {
    solve_with_stats(triangle, target).0
}

/// Like [`solve`], but also reports how much searching it took.
pub fn solve_with_stats(triangle: &Triangle, target: u64) -> (Result<Path>, SearchStats) {
    let start_time = Instant::now();
    let mut stats = SearchStats::default();
    let result = search(triangle, target, &mut stats);
    stats.elapsed = start_time.elapsed();

    debug!(
        rows = triangle.num_rows(),
        target,
        solved = result.is_ok(),
        nodes = stats.nodes_entered,
        backtracks = stats.backtracks,
        "search finished"
    );
    (result, stats)
}

fn search(triangle: &Triangle, target: u64, stats: &mut SearchStats) -> Result<Path> {
    let Some(apex_remaining) = pruning::start(target, triangle.apex())? else {
        return Err(PuzzleError::Unsolvable);
    };

    let path_len = triangle.path_len();
    let mut state = SearchState::new(apex_remaining);
    let mut first_choice = Move::Left;

    loop {
        if state.depth() == path_len {
            if pruning::is_solved(state.remaining()) {
                return Ok(state.path());
            }
        } else if let Some(decision) = next_decision(triangle, &state, first_choice)? {
            stats.nodes_entered += 1;
            state.stack.push(decision);
            first_choice = Move::Left;
            continue;
        }

        // Dead end: either a full path with the wrong product or no child
        // divides what is left.
        stats.backtracks += 1;
        if !state.backtrack() {
            return Err(PuzzleError::Unsolvable);
        }
        first_choice = Move::Right;
    }
}
