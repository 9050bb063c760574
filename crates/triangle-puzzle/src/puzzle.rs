//! Puzzle representation types.
//!
//! A [`Triangle`] is validated on construction (including when it is
//! deserialized from JSON), so the solver and generator can rely on its
//! shape and on every cell being positive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{PuzzleError, Result};

/// Most moves a path can hold without spilling to the heap.
pub const INLINE_MOVES: usize = 16;

/// A single descent from one row to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    Left,
    Right,
}

impl Move {
    /// Column offset into the next row, relative to the current column.
    pub fn offset(self) -> usize {
        match self {
            Move::Left => 0,
            Move::Right => 1,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Move::Left => 'L',
            Move::Right => 'R',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Move> {
        match symbol.to_ascii_uppercase() {
            'L' => Some(Move::Left),
            'R' => Some(Move::Right),
            _ => None,
        }
    }
}

/// A sequence of moves from the apex downwards.
///
/// Serialized as a string of `L`/`R` symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Path {
    moves: SmallVec<[Move; INLINE_MOVES]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }
}

impl FromIterator<Move> for Path {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mv in &self.moves {
            write!(f, "{}", mv.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                Move::from_symbol(c).ok_or_else(|| {
                    PuzzleError::invalid(format!("'{}' is not a move, expected 'L' or 'R'", c))
                })
            })
            .collect()
    }
}

impl From<Path> for String {
    fn from(path: Path) -> String {
        path.to_string()
    }
}

impl TryFrom<String> for Path {
    type Error = PuzzleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Rows of positive integers, row `i` holding `i + 1` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<u64>>", try_from = "Vec<Vec<u64>>")]
pub struct Triangle {
    rows: Vec<Vec<u64>>,
}

impl Triangle {
    /// Validate the shape and the values of `rows`.
    pub fn new(rows: Vec<Vec<u64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(PuzzleError::invalid("the triangle has no rows"));
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != index + 1 {
                return Err(PuzzleError::invalid(format!(
                    "row {} has {} values, expected {}",
                    index + 1,
                    row.len(),
                    index + 1
                )));
            }
            if let Some(position) = row.iter().position(|&value| value == 0) {
                return Err(PuzzleError::invalid(format!(
                    "row {} position {} is zero, values must be positive",
                    index + 1,
                    position + 1
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of moves in every complete path.
    pub fn path_len(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn apex(&self) -> u64 {
        self.rows[0][0]
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Value at a position (bounds-checked)
    pub fn get(&self, row: usize, column: usize) -> Option<u64> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Largest value anywhere in the triangle.
    pub fn max_value(&self) -> u64 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }
}

impl From<Triangle> for Vec<Vec<u64>> {
    fn from(triangle: Triangle) -> Self {
        triangle.rows
    }
}

impl TryFrom<Vec<Vec<u64>>> for Triangle {
    type Error = PuzzleError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self> {
        Triangle::new(rows)
    }
}

/// Puzzle difficulty, which scales the largest value a cell may hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn multiplier(self) -> u64 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// Largest cell value for a triangle of `rows` rows.
    pub fn max_value(self, rows: usize) -> u64 {
        self.multiplier() * rows as u64
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(PuzzleError::invalid(format!(
                "unknown difficulty '{}', options are easy, medium or hard",
                other
            ))),
        }
    }
}

/// Serialized shape of a puzzle before validation.
#[derive(Deserialize)]
struct RawPuzzle {
    triangle: Triangle,
    target: u64,
    #[serde(default)]
    solution: Option<Path>,
}

/// A triangle together with its target and, once found, its solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPuzzle")]
pub struct Puzzle {
    triangle: Triangle,
    target: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Path>,
}

impl TryFrom<RawPuzzle> for Puzzle {
    type Error = PuzzleError;

    fn try_from(raw: RawPuzzle) -> Result<Self> {
        let puzzle = Puzzle::new(raw.triangle, raw.target)?;
        match raw.solution {
            Some(solution) => puzzle.with_solution(solution),
            None => Ok(puzzle),
        }
    }
}

impl Puzzle {
    pub fn new(triangle: Triangle, target: u64) -> Result<Self> {
        if target == 0 {
            return Err(PuzzleError::invalid("the target must be a positive integer"));
        }
        Ok(Self {
            triangle,
            target,
            solution: None,
        })
    }

    /// Attach a known solution; it must be a full path reaching the target.
    pub fn with_solution(mut self, solution: Path) -> Result<Self> {
        if solution.len() != self.triangle.path_len() {
            return Err(PuzzleError::invalid(format!(
                "solution has {} moves, expected {}",
                solution.len(),
                self.triangle.path_len()
            )));
        }
        if !self.is_solution(&solution) {
            return Err(PuzzleError::invalid(format!(
                "solution {} does not reach the target {}",
                solution, self.target
            )));
        }
        self.solution = Some(solution);
        Ok(self)
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn solution(&self) -> Option<&Path> {
        self.solution.as_ref()
    }

    /// Run the solver and remember the path it finds.
    pub fn solve(&mut self) -> Result<&Path> {
        let path = crate::solver::solve(&self.triangle, self.target)?;
        Ok(&*self.solution.insert(path))
    }

    /// Check that `path` is a complete path whose product is the target.
    pub fn is_solution(&self, path: &Path) -> bool {
        crate::executor::replay(&self.triangle, path)
            .map(|walk| walk.reaches(self.target))
            .unwrap_or(false)
    }

    /// Whether exactly one path reaches the target.
    pub fn has_unique_solution(&self) -> Result<bool> {
        Ok(crate::executor::count_solutions(&self.triangle, self.target)? == 1)
    }
}
