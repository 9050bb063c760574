//! Path replay and exhaustive path enumeration.
//!
//! Replaying walks a single path down a triangle and records what it
//! visits. Enumeration walks all 2^(rows - 1) paths; the generator uses it
//! to find products reached by exactly one path, and it doubles as the
//! brute-force reference the pruned solver is checked against.

use std::collections::BTreeMap;

use crate::error::{PuzzleError, Result};
use crate::puzzle::{Move, Path, Triangle};

/// Longest path the enumerator will expand (2^20 leaves).
pub const MAX_ENUMERATED_MOVES: usize = 20;

/// Values visited by one path and their product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    pub values: Vec<u64>,
    /// `None` when the product overflows `u64`, so it can match no target.
    pub product: Option<u64>,
}

impl Walk {
    pub fn reaches(&self, target: u64) -> bool {
        self.product == Some(target)
    }
}

/// Follow `path` from the apex and collect the visited values.
pub fn replay(triangle: &Triangle, path: &Path) -> Result<Walk> {
    if path.len() != triangle.path_len() {
        return Err(PuzzleError::invalid(format!(
            "path has {} moves but the triangle needs {}",
            path.len(),
            triangle.path_len()
        )));
    }

    let mut values = Vec::with_capacity(triangle.num_rows());
    values.push(triangle.apex());
    let mut column = 0;
    for (row, mv) in path.moves().iter().enumerate() {
        column += mv.offset();
        // Shape is validated, so every column on a full-length path exists.
        let value = triangle
            .get(row + 1, column)
            .ok_or_else(|| PuzzleError::invalid("path leaves the triangle"))?;
        values.push(value);
    }

    let product = checked_product(&values);
    Ok(Walk { values, product })
}

/// Decode path number `index` over `len` moves.
///
/// The most significant of the `len` bits is the first move; a set bit
/// means `Right`.
pub fn path_from_index(index: u64, len: usize) -> Path {
    (0..len)
        .map(|step| {
            let bit = len - 1 - step;
            if (index >> bit) & 1 == 1 {
                Move::Right
            } else {
                Move::Left
            }
        })
        .collect()
}

/// Product of every path, for all 2^(rows - 1) paths in index order.
pub fn all_path_products(triangle: &Triangle) -> Result<Vec<Option<u64>>> {
    let len = triangle.path_len();
    if len > MAX_ENUMERATED_MOVES {
        return Err(PuzzleError::invalid(format!(
            "{} rows is too many to enumerate every path, the limit is {}",
            triangle.num_rows(),
            MAX_ENUMERATED_MOVES + 1
        )));
    }

    let apex = triangle.apex();
    let products = (0..1u64 << len)
        .map(|index| {
            let mut product = Some(apex);
            let mut column = 0;
            for step in 0..len {
                column += ((index >> (len - 1 - step)) & 1) as usize;
                let value = triangle.rows()[step + 1][column];
                product = product.and_then(|p| p.checked_mul(value));
            }
            product
        })
        .collect();
    Ok(products)
}

/// How many paths reach each product. Overflowing products are left out.
pub fn tally_products(triangle: &Triangle) -> Result<BTreeMap<u64, usize>> {
    let mut counts = BTreeMap::new();
    for product in all_path_products(triangle)?.into_iter().flatten() {
        *counts.entry(product).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Products reached by exactly one path, in ascending order.
pub fn unique_products(triangle: &Triangle) -> Result<Vec<u64>> {
    Ok(tally_products(triangle)?
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(product, _)| product)
        .collect())
}

/// Number of paths whose product equals `target`.
pub fn count_solutions(triangle: &Triangle, target: u64) -> Result<usize> {
    Ok(all_path_products(triangle)?
        .into_iter()
        .filter(|&product| product == Some(target))
        .count())
}

/// First path, in index order, whose product equals `target`.
pub fn find_path_with_product(triangle: &Triangle, target: u64) -> Result<Option<Path>> {
    Ok(all_path_products(triangle)?
        .into_iter()
        .position(|product| product == Some(target))
        .map(|index| path_from_index(index as u64, triangle.path_len())))
}

fn checked_product(values: &[u64]) -> Option<u64> {
    values
        .iter()
        .try_fold(1u64, |acc, &value| acc.checked_mul(value))
}
