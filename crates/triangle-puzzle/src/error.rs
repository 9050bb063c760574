//! Error kinds surfaced by the solver, generator and text format.

use thiserror::Error;

/// Everything that can go wrong while building, solving or generating a puzzle.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// Malformed triangle, bad target, or out-of-range generation request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every path was tried and none reaches the target.
    #[error("there is no solution to this puzzle")]
    Unsolvable,

    /// No uniquely solvable triangle turned up within the retry budget.
    #[error("no uniquely solvable triangle found after {attempts} attempts")]
    GenerationFailed { attempts: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PuzzleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PuzzleError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
