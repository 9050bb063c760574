//! Plain-text puzzle format.
//!
//! ```text
//! Target: 48
//!
//!    2
//!  3, 4
//! 5, 1, 6
//!
//! Solution: RR
//! ```
//!
//! Rows are comma-separated values, one row per line. Any other non-blank
//! line is a `key: value` pair; `Target` must appear exactly once and
//! `Solution` is optional.

use std::fs;
use std::path::{Path as FsPath, PathBuf};

use tracing::info;

use crate::error::{PuzzleError, Result};
use crate::puzzle::{Path, Puzzle, Triangle};

/// Spacing used when rendering a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Spaces after each comma within a row
    pub horizontal_spacing: usize,
    /// Blank lines between rows; sections get at least one
    pub vertical_spacing: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            horizontal_spacing: 1,
            vertical_spacing: 0,
        }
    }
}

/// Parse a puzzle from its text form.
pub fn parse_puzzle(text: &str) -> Result<Puzzle> {
    let mut rows = Vec::new();
    let mut target = None;
    let mut solution = None;

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(|c: char| c.is_ascii_digit()) {
            rows.push(parse_row(line, line_number)?);
            continue;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| {
            PuzzleError::invalid(format!(
                "line {}: expected a row of values or a 'key: value' line",
                line_number
            ))
        })?;
        match key.trim().to_ascii_lowercase().as_str() {
            "target" => {
                if target.is_some() {
                    return Err(PuzzleError::invalid(format!(
                        "line {}: more than one target was specified",
                        line_number
                    )));
                }
                target = Some(parse_value(value.trim(), line_number)?);
            }
            "solution" => {
                if solution.is_some() {
                    return Err(PuzzleError::invalid(format!(
                        "line {}: more than one solution was specified",
                        line_number
                    )));
                }
                solution = Some(value.parse::<Path>()?);
            }
            other => {
                return Err(PuzzleError::invalid(format!(
                    "line {}: unknown key '{}'",
                    line_number, other
                )))
            }
        }
    }

    let target = target.ok_or_else(|| PuzzleError::invalid("could not find a target value"))?;
    let puzzle = Puzzle::new(Triangle::new(rows)?, target)?;
    match solution {
        Some(solution) => puzzle.with_solution(solution),
        None => Ok(puzzle),
    }
}

fn parse_row(line: &str, line_number: usize) -> Result<Vec<u64>> {
    line.split(',')
        .map(|token| parse_value(token.trim(), line_number))
        .collect()
}

fn parse_value(token: &str, line_number: usize) -> Result<u64> {
    token.parse().map_err(|_| {
        PuzzleError::invalid(format!(
            "line {}: '{}' is not a positive integer",
            line_number, token
        ))
    })
}

/// Render the triangle and target, plus the solution when one is given.
pub fn render_puzzle(puzzle: &Puzzle, solution: Option<&Path>, layout: &Layout) -> String {
    let triangle = puzzle.triangle();
    let width = triangle.max_value().to_string().len();
    let separator = format!(",{}", " ".repeat(layout.horizontal_spacing));

    let lines: Vec<String> = triangle
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| format!("{:>width$}", value, width = width))
                .collect::<Vec<_>>()
                .join(&separator)
        })
        .collect();
    let base_width = lines.last().map_or(0, |line| line.len());

    let row_gap = "\n".repeat(layout.vertical_spacing + 1);
    let section_gap = "\n".repeat(layout.vertical_spacing.max(1) + 1);

    let mut out = format!("Target: {}", puzzle.target());
    out.push_str(&section_gap);
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push_str(&row_gap);
        }
        out.push_str(&" ".repeat((base_width - line.len()) / 2));
        out.push_str(line);
    }
    if let Some(solution) = solution {
        out.push_str(&section_gap);
        out.push_str(format!("Solution: {}", solution).trim_end());
    }
    out.push('\n');
    out
}

/// Where the answer key for a puzzle written to `path` goes:
/// `puzzle.txt` becomes `puzzle_answers.txt`.
pub fn answer_key_path(path: &FsPath) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_answers.{}", stem, ext.to_string_lossy()),
        None => format!("{}_answers", stem),
    };
    path.with_file_name(name)
}

/// Write the puzzle to `path` and, if asked, an answer key next to it.
///
/// The puzzle file never contains the solution. When the puzzle has no
/// stored solution the answer key is solved for on the spot. Returns the
/// paths written.
pub fn write_puzzle_files(
    path: &FsPath,
    puzzle: &Puzzle,
    layout: &Layout,
    answer_key: bool,
) -> Result<Vec<PathBuf>> {
    fs::write(path, render_puzzle(puzzle, None, layout))?;
    info!(path = %path.display(), "wrote puzzle");
    let mut written = vec![path.to_path_buf()];

    if answer_key {
        let solution = match puzzle.solution() {
            Some(solution) => solution.clone(),
            None => crate::solver::solve(puzzle.triangle(), puzzle.target())?,
        };
        let key_path = answer_key_path(path);
        fs::write(&key_path, render_puzzle(puzzle, Some(&solution), layout))?;
        info!(path = %key_path.display(), "wrote answer key");
        written.push(key_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_puzzle() -> Puzzle {
        let triangle = Triangle::new(vec![vec![2], vec![3, 4], vec![5, 1, 6]]).unwrap();
        Puzzle::new(triangle, 48).unwrap()
    }

    #[test]
    fn test_render_layout() {
        let puzzle = sample_puzzle();
        let solution: Path = "RR".parse().unwrap();
        let text = render_puzzle(&puzzle, Some(&solution), &Layout::default());
        assert_eq!(text, "Target: 48\n\n   2\n 3, 4\n5, 1, 6\n\nSolution: RR\n");
    }

    #[test]
    fn test_render_spacing_and_width() {
        let triangle = Triangle::new(vec![vec![12], vec![3, 45]]).unwrap();
        let puzzle = Puzzle::new(triangle, 36).unwrap();
        let layout = Layout {
            horizontal_spacing: 2,
            vertical_spacing: 1,
        };
        let text = render_puzzle(&puzzle, None, &layout);
        assert_eq!(text, "Target: 36\n\n  12\n\n 3,  45\n");
    }

    #[test]
    fn test_round_trip() {
        let puzzle = sample_puzzle().with_solution("RR".parse().unwrap()).unwrap();
        for (h, v) in [(0, 0), (1, 0), (3, 2)] {
            let layout = Layout {
                horizontal_spacing: h,
                vertical_spacing: v,
            };
            let text = render_puzzle(&puzzle, puzzle.solution(), &layout);
            assert_eq!(parse_puzzle(&text).unwrap(), puzzle);
        }
    }

    #[test]
    fn test_round_trip_single_row() {
        let puzzle = Puzzle::new(Triangle::new(vec![vec![7]]).unwrap(), 7)
            .unwrap()
            .with_solution(Path::new())
            .unwrap();
        let text = render_puzzle(&puzzle, puzzle.solution(), &Layout::default());
        assert_eq!(text, "Target: 7\n\n7\n\nSolution:\n");
        assert_eq!(parse_puzzle(&text).unwrap(), puzzle);
    }

    #[test]
    fn test_parse_accepts_loose_formatting() {
        let text = "target:36\n  2\n3 ,4\n\n 5,1 , 6 \n";
        let puzzle = parse_puzzle(text).unwrap();
        assert_eq!(puzzle.target(), 36);
        assert_eq!(puzzle.triangle().rows()[2], vec![5, 1, 6]);
        assert!(puzzle.solution().is_none());
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("2\n3, 4\n", "missing target"),
            ("Target: 6\nTarget: 8\n2\n3, 4\n", "two targets"),
            ("Target: 6\n2\n3, 4, 5\n", "bad row length"),
            ("Target: 6\n2\n3, x\n", "non-integer value"),
            ("Target: 6\n2\n3, 0\n", "zero value"),
            ("Target: -6\n2\n3, 4\n", "negative target"),
            ("Target: 0\n2\n3, 4\n", "zero target"),
            ("Goal: 6\n2\n3, 4\n", "unknown key"),
            ("Target 6\n2\n3, 4\n", "no colon"),
            ("Target: 6\n2\n3, 4\nSolution: LR\n", "solution too long"),
            ("Target: 6\n2\n3, 4\nSolution: R\n", "solution misses target"),
        ];
        for (text, case) in cases {
            assert!(
                matches!(parse_puzzle(text), Err(PuzzleError::InvalidInput(_))),
                "{}",
                case
            );
        }
    }

    #[test]
    fn test_answer_key_path() {
        assert_eq!(
            answer_key_path(FsPath::new("out/puzzle.txt")),
            PathBuf::from("out/puzzle_answers.txt")
        );
        assert_eq!(
            answer_key_path(FsPath::new("puzzle")),
            PathBuf::from("puzzle_answers")
        );
    }

    #[test]
    fn test_parse_rejects_wrong_solution() {
        let text = "Target: 48\n2\n3, 4\n5, 1, 6\nSolution: LL\n";
        assert!(matches!(parse_puzzle(text), Err(PuzzleError::InvalidInput(_))));

        let text = "Target: 48\n2\n3, 4\n5, 1, 6\nSolution: RR\n";
        let puzzle = parse_puzzle(text).unwrap();
        assert_eq!(puzzle.solution().map(|p| p.to_string()), Some("RR".to_string()));
    }

    #[test]
    fn test_write_puzzle_files() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path();
        let path = dir.join("puzzle.txt");

        let puzzle = sample_puzzle();
        let written = write_puzzle_files(&path, &puzzle, &Layout::default(), true).unwrap();
        assert_eq!(written, vec![path.clone(), dir.join("puzzle_answers.txt")]);

        let plain = parse_puzzle(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(plain.solution().is_none());
        let key = parse_puzzle(&fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(key.solution().map(|p| p.to_string()), Some("RR".to_string()));
    }
}
