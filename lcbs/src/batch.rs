//! Scoring many candidate pairs at once.
//!
//! Each pair gets its own universe and memo table, so pairs are scored in
//! parallel without any coordination.

use rayon::prelude::*;

use crate::debug;
use crate::sequence::BalancedSequence;
use crate::similarity::{SimilarityConfig, similarity_with_config};

/// Scores between every left and every right sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    /// Row-major; `None` where the pair's memo table would exceed the budget.
    scores: Vec<Option<u32>>,
}

impl SimilarityMatrix {
    /// Number of left sequences.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of right sequences.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Score of `(left[row], right[col])`, or `None` if it was not computed.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        assert!(row < self.rows && col < self.cols, "({row}, {col}) out of range");
        self.scores[row * self.cols + col]
    }

    /// The column with the highest score in `row`; ties go to the lowest column.
    /// Returns `None` if the row has no computed score.
    pub fn best_for_row(&self, row: usize) -> Option<(usize, u32)> {
        assert!(row < self.rows, "row {row} out of range");
        self.scores[row * self.cols..(row + 1) * self.cols]
            .iter()
            .enumerate()
            .filter_map(|(col, score)| score.map(|s| (col, s)))
            .fold(None, |best, (col, s)| match best {
                Some((_, best_score)) if best_score >= s => best,
                _ => Some((col, s)),
            })
    }
}

/// Score every `(left[i], right[j])` pair in parallel.
pub fn score_matrix(
    left: &[BalancedSequence],
    right: &[BalancedSequence],
    config: &SimilarityConfig,
) -> SimilarityMatrix {
    let rows = left.len();
    let cols = right.len();
    debug!(rows, cols, "score_matrix start");

    let scores = (0..rows * cols)
        .into_par_iter()
        .map(|index| {
            let (row, col) = (index / cols, index % cols);
            match similarity_with_config(&left[row], &right[col], config) {
                Ok(score) => Some(score),
                Err(_err) => {
                    debug!(row, col, %_err, "pair skipped");
                    None
                }
            }
        })
        .collect();

    SimilarityMatrix { rows, cols, scores }
}
