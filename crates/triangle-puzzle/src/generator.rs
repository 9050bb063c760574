//! Random puzzle generation with a guaranteed unique solution.
//!
//! A candidate triangle is sampled, every path product is enumerated, and
//! the triangle is kept only if some product is reached by exactly one
//! path. That product becomes the target.

use tracing::{debug, info, warn};

use crate::error::{PuzzleError, Result};
use crate::executor::{find_path_with_product, unique_products};
use crate::puzzle::{Difficulty, Puzzle, Triangle};

pub const MIN_ROWS: usize = 2;
/// Enumeration cost doubles per row; 11 rows means 1024 paths per attempt.
pub const MAX_ROWS: usize = 11;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Smallest value a generated cell may hold.
const MIN_VALUE: u64 = 2;

/// Configuration for the generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub difficulty: Difficulty,
    /// Candidate triangles to try before giving up
    pub max_attempts: usize,
    /// Fixed seed for reproducible puzzles; random when `None`
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            difficulty: Difficulty::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

/// Draws cell values from `MIN_VALUE..=max`, weighting each value by its
/// reversed rank so small values are the most common.
#[derive(Debug, Clone)]
struct ValueSampler {
    values: Vec<u64>,
    cumulative: Vec<u64>,
}

impl ValueSampler {
    fn new(max_value: u64) -> Self {
        let values: Vec<u64> = (MIN_VALUE..=max_value).collect();
        let mut total = 0;
        let cumulative = values
            .iter()
            .map(|&value| {
                total += max_value + MIN_VALUE - value;
                total
            })
            .collect();
        Self { values, cumulative }
    }

    fn sample(&self, rng: &mut fastrand::Rng) -> u64 {
        let total = self.cumulative.last().copied().unwrap_or(0);
        let pick = rng.u64(0..total);
        let index = self.cumulative.partition_point(|&c| c <= pick);
        self.values[index]
    }

    fn triangle(&self, rng: &mut fastrand::Rng, rows: usize) -> Result<Triangle> {
        let rows: Vec<Vec<u64>> = (0..rows)
            .map(|row| (0..=row).map(|_| self.sample(rng)).collect::<Vec<u64>>())
            .collect();
        Triangle::new(rows)
    }
}

/// Generate a uniquely solvable puzzle with default retry settings.
pub fn generate(rows: usize, difficulty: Difficulty) -> Result<Puzzle> {
    generate_with(&GeneratorConfig {
        rows,
        difficulty,
        ..GeneratorConfig::default()
    })
}

/// Generate a uniquely solvable puzzle; the returned puzzle carries its
/// solution.
pub fn generate_with(config: &GeneratorConfig) -> Result<Puzzle> {
    if !(MIN_ROWS..=MAX_ROWS).contains(&config.rows) {
        return Err(PuzzleError::invalid(format!(
            "a generated triangle needs between {} and {} rows, got {}",
            MIN_ROWS, MAX_ROWS, config.rows
        )));
    }

    let mut rng = match config.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let max_value = config.difficulty.max_value(config.rows);
    let sampler = ValueSampler::new(max_value);

    let (puzzle, attempt) = first_unique_puzzle(config.max_attempts, &mut rng, |rng| {
        sampler.triangle(rng, config.rows)
    })?;
    info!(
        rows = config.rows,
        difficulty = %config.difficulty,
        attempt,
        target = puzzle.target(),
        "generated puzzle"
    );
    Ok(puzzle)
}

/// Draw candidate triangles until one has a product reached by exactly one
/// path. Returns the puzzle and the attempt it was found on.
fn first_unique_puzzle(
    max_attempts: usize,
    rng: &mut fastrand::Rng,
    mut candidate: impl FnMut(&mut fastrand::Rng) -> Result<Triangle>,
) -> Result<(Puzzle, usize)> {
    for attempt in 1..=max_attempts {
        let triangle = candidate(rng)?;
        let targets = unique_products(&triangle)?;
        if targets.is_empty() {
            debug!(attempt, "no product is reached by exactly one path, retrying");
            continue;
        }

        let target = targets[rng.usize(..targets.len())];
        let solution = find_path_with_product(&triangle, target)?.ok_or_else(|| {
            PuzzleError::invalid(format!("no path reaches chosen target {}", target))
        })?;
        debug!(attempt, candidates = targets.len(), target, "accepted triangle");
        let puzzle = Puzzle::new(triangle, target)?.with_solution(solution)?;
        return Ok((puzzle, attempt));
    }

    warn!(
        attempts = max_attempts,
        "gave up looking for a uniquely solvable triangle"
    );
    Err(PuzzleError::GenerationFailed {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::count_solutions;
    use crate::solver::solve;

    fn seeded(rows: usize, difficulty: Difficulty, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            rows,
            difficulty,
            seed: Some(seed),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_rejects_row_counts_out_of_range() {
        for rows in [0, 1, 12, 20] {
            assert!(
                matches!(
                    generate(rows, Difficulty::Medium),
                    Err(PuzzleError::InvalidInput(_))
                ),
                "rows {}",
                rows
            );
        }
    }

    #[test]
    fn test_two_rows_always_succeeds() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for seed in 0..20 {
                let puzzle = generate_with(&seeded(2, difficulty, seed)).unwrap();
                assert_eq!(puzzle.triangle().num_rows(), 2);
                assert!(puzzle.has_unique_solution().unwrap());
            }
        }
    }

    #[test]
    fn test_generated_puzzles_have_unique_solution() {
        for rows in 3..=8 {
            for seed in 0..5 {
                let puzzle = generate_with(&seeded(rows, Difficulty::Hard, seed)).unwrap();
                let triangle = puzzle.triangle();
                assert_eq!(count_solutions(triangle, puzzle.target()).unwrap(), 1);

                let stored = puzzle.solution().unwrap();
                assert!(puzzle.is_solution(stored));
                assert_eq!(&solve(triangle, puzzle.target()).unwrap(), stored);
            }
        }
    }

    #[test]
    fn test_values_stay_in_difficulty_range() {
        let puzzle = generate_with(&seeded(6, Difficulty::Easy, 7)).unwrap();
        let max = Difficulty::Easy.max_value(6);
        for &value in puzzle.triangle().rows().iter().flatten() {
            assert!((MIN_VALUE..=max).contains(&value), "value {}", value);
        }
    }

    #[test]
    fn test_largest_triangle() {
        let puzzle = generate_with(&seeded(MAX_ROWS, Difficulty::Medium, 42)).unwrap();
        assert_eq!(puzzle.triangle().num_rows(), MAX_ROWS);
        assert!(puzzle.has_unique_solution().unwrap());
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let a = generate_with(&seeded(5, Difficulty::Medium, 99)).unwrap();
        let b = generate_with(&seeded(5, Difficulty::Medium, 99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_attempts_fails() {
        let config = GeneratorConfig {
            max_attempts: 0,
            ..seeded(4, Difficulty::Easy, 1)
        };
        assert!(matches!(
            generate_with(&config),
            Err(PuzzleError::GenerationFailed { attempts: 0 })
        ));
    }

    #[test]
    fn test_gives_up_after_every_attempt_fails() {
        // Both paths multiply to 6, so no product is unique.
        let mut rng = fastrand::Rng::with_seed(3);
        let mut drawn = 0;
        let result = first_unique_puzzle(4, &mut rng, |_| {
            drawn += 1;
            Triangle::new(vec![vec![2], vec![3, 3]])
        });
        assert!(matches!(
            result,
            Err(PuzzleError::GenerationFailed { attempts: 4 })
        ));
        assert_eq!(drawn, 4);
    }

    #[test]
    fn test_retries_until_a_unique_product_appears() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut drawn = 0;
        let (puzzle, attempt) = first_unique_puzzle(10, &mut rng, |_| {
            drawn += 1;
            if drawn < 3 {
                Triangle::new(vec![vec![2], vec![3, 3]])
            } else {
                // LL = 12, LR = 18, RL = 30, RR = 70
                Triangle::new(vec![vec![2], vec![3, 5], vec![2, 3, 7]])
            }
        })
        .unwrap();
        assert_eq!(attempt, 3);
        assert!([12, 18, 30, 70].contains(&puzzle.target()));
        assert!(puzzle.has_unique_solution().unwrap());
        assert!(puzzle.is_solution(puzzle.solution().unwrap()));
    }

    #[test]
    fn test_sampler_favors_small_values() {
        let sampler = ValueSampler::new(4);
        // Weights for 2, 3, 4 are 4, 3, 2.
        assert_eq!(sampler.cumulative, vec![4, 7, 9]);

        let mut rng = fastrand::Rng::with_seed(5);
        let mut counts = [0usize; 3];
        for _ in 0..9000 {
            counts[(sampler.sample(&mut rng) - MIN_VALUE) as usize] += 1;
        }
        assert!(counts[0] > counts[1]);
        assert!(counts[1] > counts[2]);
    }
}
