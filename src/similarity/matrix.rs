// Packed symmetric similarity matrix.
//
// Only the strict lower triangle is stored, in one flat buffer of
// N*(N-1)/2 cells. Canonical row r (the larger index) occupies the contiguous
// range [r*(r-1)/2, r*(r-1)/2 + r), so (i, j) and (j, i) always resolve to the
// same slot. The diagonal is implicitly 1.0 and never stored.
//
// Unset cells hold NaN.

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Sentinel stored in cells that have not been computed yet.
pub const UNSET: f32 = f32::NAN;

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityMatrix {
    size: usize,
    #[serde(rename = "packed")]
    data: Vec<f32>,
}

/// One canonical row of the packed buffer: the cells (row, 0..row).
#[derive(Debug)]
pub struct MatrixRow<'a> {
    pub row: usize,
    pub cells: &'a mut [f32],
}

impl SimilarityMatrix {
    /// Allocate storage for `size` items with every off-diagonal cell unset.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![UNSET; packed_len(size)],
        }
    }

    /// Number of items (N), not the packed length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The raw lower-triangular buffer.
    pub fn packed(&self) -> &[f32] {
        &self.data
    }

    /// Flat offset of the off-diagonal cell (i, j), in either argument order.
    pub fn map_index(&self, i: usize, j: usize) -> Result<usize> {
        self.check_bounds(i, j)?;
        if i == j {
            return Err(AnalysisError::InvalidDiagonalAccess { index: i });
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        Ok(row_offset(row) + col)
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) -> Result<()> {
        let offset = self.map_index(i, j)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Similarity of (i, j). The diagonal is always 1.0; a cell that was never
    /// set reads as `UNSET` (NaN).
    pub fn get(&self, i: usize, j: usize) -> Result<f32> {
        self.check_bounds(i, j)?;
        if i == j {
            return Ok(1.0);
        }
        Ok(self.data[self.map_index(i, j)?])
    }

    /// Whether (i, j) holds a computed value. Diagonal cells always do.
    pub fn is_set(&self, i: usize, j: usize) -> Result<bool> {
        Ok(!self.get(i, j)?.is_nan())
    }

    /// Number of off-diagonal cells that hold a computed value.
    pub fn computed_cells(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Split the buffer into its canonical rows. Rows never overlap, so each
    /// one can be handed to a different worker without locking.
    pub fn rows_mut(&mut self) -> Vec<MatrixRow<'_>> {
        let mut rows = Vec::with_capacity(self.size);
        let mut rest: &mut [f32] = &mut self.data;
        for row in 0..self.size {
            let (cells, tail) = std::mem::take(&mut rest).split_at_mut(row);
            rows.push(MatrixRow { row, cells });
            rest = tail;
        }
        rows
    }

    fn check_bounds(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.size || j >= self.size {
            return Err(AnalysisError::IndexOutOfRange {
                row: i,
                col: j,
                size: self.size,
            });
        }
        Ok(())
    }
}

fn row_offset(row: usize) -> usize {
    row * row.saturating_sub(1) / 2
}

fn packed_len(size: usize) -> usize {
    row_offset(size)
}
