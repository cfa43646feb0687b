// Cosine similarity between two TF-IDF vectors.
//
// Elements are f32; the dot product and both norms accumulate in f64 so long
// vocabularies don't lose precision to cancellation.
//
// A zero-norm operand makes the ratio undefined. `cosine_similarity` maps that
// case to 0.0 (no shared weighted vocabulary means maximally dissimilar);
// `cosine_similarity_strict` reports it as `DegenerateVector` instead.

use crate::error::{AnalysisError, Result};
use crate::tfidf::index::Vector;

/// Cosine similarity with the zero-norm case defined as 0.0.
pub fn cosine_similarity(a: &Vector, b: &Vector) -> Result<f64> {
    match cosine_parts(a, b)? {
        Some(score) => Ok(score),
        None => Ok(0.0),
    }
}

/// Cosine similarity that fails on a zero-norm operand.
pub fn cosine_similarity_strict(a: &Vector, b: &Vector) -> Result<f64> {
    cosine_parts(a, b)?.ok_or(AnalysisError::DegenerateVector)
}

/// Returns `None` when either norm is exactly zero.
fn cosine_parts(a: &Vector, b: &Vector) -> Result<Option<f64>> {
    if a.snapshot() != b.snapshot() {
        return Err(AnalysisError::VocabularyMismatch {
            left: a.snapshot(),
            right: b.snapshot(),
        });
    }
    if a.len() != b.len() {
        return Err(AnalysisError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(cosine_raw(a.values(), b.values()))
}

/// Cosine of two equal-length slices, or `None` for a zero-norm operand.
pub fn cosine_raw(a: &[f32], b: &[f32]) -> Option<f64> {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    // Identical operands give dot == norm_a == norm_b; skip the sqrt round trip
    // so self-similarity is exactly 1.0.
    if dot == norm_a && dot == norm_b {
        return Some(1.0);
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
