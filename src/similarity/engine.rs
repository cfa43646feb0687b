// Similarity engine — fills the packed matrix with pairwise cosine scores.
//
// Only the N*(N-1)/2 unordered pairs are computed; symmetry answers the
// reverse query. Cells that already hold a value are skipped.
//
// The parallel path partitions work by canonical row. Each rayon task owns one
// contiguous slice of the packed buffer, so no two workers write the same
// cell and no locking is needed.

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use super::cosine::cosine_similarity;
use super::matrix::{MatrixRow, SimilarityMatrix};
use crate::error::{AnalysisError, Result};
use crate::tfidf::index::Vector;

/// How many cells a population pass computed versus found already set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulateStats {
    pub computed: usize,
    pub memoized: usize,
}

impl std::ops::Add for PopulateStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            computed: self.computed + other.computed,
            memoized: self.memoized + other.memoized,
        }
    }
}

#[derive(Default)]
pub struct SimilarityEngine {
    /// Advanced by one per pair visited
    progress: Option<ProgressBar>,
}

impl SimilarityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report progress to `pb` while populating.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    /// Compute every unset pair (i, j), i < j, in ascending order.
    pub fn populate(
        &self,
        vectors: &[Vector],
        matrix: &mut SimilarityMatrix,
    ) -> Result<PopulateStats> {
        check_shapes(vectors, matrix)?;
        let n = vectors.len();
        let mut stats = PopulateStats::default();

        for i in 0..n {
            for j in (i + 1)..n {
                if matrix.is_set(i, j)? {
                    stats.memoized += 1;
                } else {
                    let score = cosine_similarity(&vectors[i], &vectors[j])?;
                    matrix.set(i, j, score as f32)?;
                    stats.computed += 1;
                    debug!(i, j, score, "Computed pair similarity");
                }
            }
            if let Some(pb) = &self.progress {
                pb.inc((n - i - 1) as u64);
            }
        }

        info!(
            computed = stats.computed,
            memoized = stats.memoized,
            "Populated similarity matrix"
        );
        Ok(stats)
    }

    /// Same result as `populate`, with canonical rows spread across rayon's pool.
    pub fn populate_parallel(
        &self,
        vectors: &[Vector],
        matrix: &mut SimilarityMatrix,
    ) -> Result<PopulateStats> {
        check_shapes(vectors, matrix)?;

        let per_row: Vec<PopulateStats> = matrix
            .rows_mut()
            .into_par_iter()
            .map(|MatrixRow { row, cells }| -> Result<PopulateStats> {
                let mut stats = PopulateStats::default();
                for (col, cell) in cells.iter_mut().enumerate() {
                    if cell.is_nan() {
                        // Same operand order as the sequential path (col < row)
                        let score = cosine_similarity(&vectors[col], &vectors[row])?;
                        *cell = score as f32;
                        stats.computed += 1;
                    } else {
                        stats.memoized += 1;
                    }
                }
                if let Some(pb) = &self.progress {
                    pb.inc(row as u64);
                }
                Ok(stats)
            })
            .collect::<Result<Vec<_>>>()?;

        let stats = per_row
            .into_iter()
            .fold(PopulateStats::default(), |acc, s| acc + s);
        info!(
            computed = stats.computed,
            memoized = stats.memoized,
            "Populated similarity matrix in parallel"
        );
        Ok(stats)
    }
}

/// Pairs a full population pass visits for a batch of `n` messages.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

fn check_shapes(vectors: &[Vector], matrix: &SimilarityMatrix) -> Result<()> {
    if vectors.len() != matrix.size() {
        return Err(AnalysisError::invalid(format!(
            "{} vectors supplied for a matrix over {} messages",
            vectors.len(),
            matrix.size()
        )));
    }
    Ok(())
}
