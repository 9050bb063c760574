//! Triangle puzzle library.
//!
//! A triangle puzzle asks for a path from the apex to the base row, moving
//! down-left or down-right, whose visited values multiply to a target.
//! This crate provides a pruned backtracking solver for such puzzles and a
//! generator that only produces puzzles with a unique solution.

pub mod error;
pub mod executor;
pub mod format;
pub mod generator;
pub mod pruning;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use error::{PuzzleError, Result};
pub use executor::{count_solutions, replay, Walk};
pub use format::{parse_puzzle, render_puzzle, write_puzzle_files, Layout};
pub use generator::{generate, generate_with, GeneratorConfig};
pub use puzzle::{Difficulty, Move, Path, Puzzle, Triangle};
pub use solver::{solve, solve_with_stats, SearchStats};
