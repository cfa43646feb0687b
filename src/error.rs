// Typed errors for the analysis core.
//
// Every variant is a local precondition violation. Nothing here is transient,
// so callers decide whether to abort the run or report the offending message.

use thiserror::Error;

/// Result alias used throughout the core pipeline.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Empty corpus, zero-token message, or malformed run parameters.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("matrix index ({row}, {col}) out of range for size {size}")]
    IndexOutOfRange { row: usize, col: usize, size: usize },

    /// The packed store holds off-diagonal cells only.
    #[error("diagonal cell ({index}, {index}) cannot be addressed in packed storage")]
    InvalidDiagonalAccess { index: usize },

    #[error("term {term:?} does not occur in any message of the corpus")]
    UndefinedTerm { term: String },

    #[error("cosine similarity is undefined for a zero-norm vector")]
    DegenerateVector,

    #[error("vectors were built against different vocabulary snapshots ({left} vs {right})")]
    VocabularyMismatch { left: u64, right: u64 },

    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

impl AnalysisError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
