// Unit tests for the packed similarity matrix, cosine scoring, and the
// population engine.

use bulkscan::error::AnalysisError;
use bulkscan::similarity::cosine::{cosine_similarity, cosine_similarity_strict};
use bulkscan::similarity::engine::{pair_count, SimilarityEngine};
use bulkscan::similarity::matrix::SimilarityMatrix;
use bulkscan::text::normalize::TextNormalizer;
use bulkscan::text::traits::Tokenizer;
use bulkscan::tfidf::index::{TfIdfIndex, Vector};

fn index_for(bodies: &[&str]) -> TfIdfIndex {
    let corpus: Vec<Vec<String>> = bodies.iter().map(|b| TextNormalizer.tokenize(b)).collect();
    TfIdfIndex::build(&corpus).unwrap()
}

// ============================================================
// SimilarityMatrix
// ============================================================

#[test]
fn two_item_matrix_round_trip() {
    let mut m = SimilarityMatrix::new(2);
    m.set(0, 1, 0.75).unwrap();
    assert_eq!(m.get(1, 0).unwrap(), 0.75);
    assert_eq!(m.get(0, 1).unwrap(), 0.75);
    assert_eq!(m.get(0, 0).unwrap(), 1.0);
    assert_eq!(m.get(1, 1).unwrap(), 1.0);
}

#[test]
fn diagonal_reads_one_without_any_set() {
    let m = SimilarityMatrix::new(5);
    for i in 0..5 {
        assert_eq!(m.get(i, i).unwrap(), 1.0);
        assert!(m.is_set(i, i).unwrap());
    }
}

#[test]
fn unset_cells_read_as_nan() {
    let m = SimilarityMatrix::new(3);
    assert!(m.get(2, 1).unwrap().is_nan());
    assert!(!m.is_set(1, 2).unwrap());
}

#[test]
fn symmetric_for_every_pair() {
    let n = 6;
    let mut m = SimilarityMatrix::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            m.set(j, i, (i * n + j) as f32 / 100.0).unwrap();
        }
    }
    for i in 0..n {
        for j in 0..n {
            if i != j {
                assert_eq!(m.get(i, j).unwrap(), m.get(j, i).unwrap());
            }
        }
    }
    assert_eq!(m.packed().len(), pair_count(n));
}

#[test]
fn diagonal_set_is_rejected() {
    let mut m = SimilarityMatrix::new(3);
    assert_eq!(
        m.set(1, 1, 0.5),
        Err(AnalysisError::InvalidDiagonalAccess { index: 1 })
    );
    assert_eq!(
        m.map_index(0, 0),
        Err(AnalysisError::InvalidDiagonalAccess { index: 0 })
    );
}

#[test]
fn out_of_range_indices_are_rejected() {
    let mut m = SimilarityMatrix::new(2);
    for (i, j) in [(2, 0), (0, 2), (2, 2), (usize::MAX, 1)] {
        assert!(matches!(
            m.get(i, j),
            Err(AnalysisError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            m.set(i, j, 0.1),
            Err(AnalysisError::IndexOutOfRange { .. })
        ));
    }
}

// ============================================================
// Cosine similarity
// ============================================================

#[test]
fn message_is_exactly_similar_to_itself() {
    let index = index_for(&[
        "Limited offer: buy now and save 50%!",
        "Meeting moved to Thursday afternoon.",
        "Your invoice for March is attached.",
    ]);
    for m in 0..3 {
        let v = index.vector_for(m).unwrap();
        assert_eq!(cosine_similarity(&v, &v).unwrap(), 1.0);
    }
}

#[test]
fn disjoint_messages_score_zero() {
    let index = index_for(&["alpha beta gamma", "delta epsilon"]);
    let a = index.vector_for(0).unwrap();
    let b = index.vector_for(1).unwrap();
    assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
}

#[test]
fn cosine_is_symmetric_and_bounded() {
    let index = index_for(&["cheap pills online now", "cheap watches online", "hello mom"]);
    let v = index.vectors().unwrap();
    let ab = cosine_similarity(&v[0], &v[1]).unwrap();
    let ba = cosine_similarity(&v[1], &v[0]).unwrap();
    assert_eq!(ab, ba);
    assert!(ab > 0.0 && ab < 1.0, "got {ab}");
}

#[test]
fn zero_vector_scores_zero_unless_strict() {
    let a = Vector::new(vec![0.3, 0.1], 1);
    let zero = Vector::new(vec![0.0, 0.0], 1);
    assert_eq!(cosine_similarity(&a, &zero).unwrap(), 0.0);
    assert_eq!(
        cosine_similarity_strict(&zero, &a),
        Err(AnalysisError::DegenerateVector)
    );
}

#[test]
fn vectors_from_different_vocabularies_are_rejected() {
    let first = index_for(&["same words here"]);
    let second = index_for(&["same words here"]);
    let a = first.vector_for(0).unwrap();
    let b = second.vector_for(0).unwrap();
    assert!(matches!(
        cosine_similarity(&a, &b),
        Err(AnalysisError::VocabularyMismatch { .. })
    ));
}

#[test]
fn wide_vocabulary_keeps_precision() {
    let values: Vec<f32> = (0..50_000).map(|i| ((i % 97) as f32 + 1.0) * 1e-4).collect();
    let a = Vector::new(values.clone(), 9);
    let b = Vector::new(values.iter().map(|x| x * 3.0).collect(), 9);
    let score = cosine_similarity(&a, &b).unwrap();
    assert!((score - 1.0).abs() < 1e-6, "got {score}");
}

// ============================================================
// SimilarityEngine
// ============================================================

#[test]
fn engine_computes_each_unordered_pair_once() {
    let index = index_for(&["a b", "b c", "c d", "d e", "e a"]);
    let vectors = index.vectors().unwrap();
    let mut m = SimilarityMatrix::new(vectors.len());
    let stats = SimilarityEngine::new().populate(&vectors, &mut m).unwrap();
    assert_eq!(stats.computed, 10);
    assert_eq!(m.computed_cells(), 10);
}

#[test]
fn engine_memoizes_existing_cells() {
    let index = index_for(&["a b", "b c", "c d"]);
    let vectors = index.vectors().unwrap();
    let mut m = SimilarityMatrix::new(3);
    m.set(2, 0, 0.42).unwrap();
    let stats = SimilarityEngine::new()
        .populate_parallel(&vectors, &mut m)
        .unwrap();
    assert_eq!(stats.memoized, 1);
    assert_eq!(stats.computed, 2);
    assert_eq!(m.get(0, 2).unwrap(), 0.42);
}

#[test]
fn parallel_and_sequential_agree() {
    let bodies: Vec<String> = (0..25)
        .map(|i| format!("offer {} deal {} today {}", i % 4, i % 7, i % 3))
        .collect();
    let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
    let index = index_for(&refs);
    let vectors = index.vectors().unwrap();

    let mut seq = SimilarityMatrix::new(vectors.len());
    let mut par = SimilarityMatrix::new(vectors.len());
    SimilarityEngine::new().populate(&vectors, &mut seq).unwrap();
    SimilarityEngine::new()
        .populate_parallel(&vectors, &mut par)
        .unwrap();

    for (s, p) in seq.packed().iter().zip(par.packed()) {
        assert_eq!(s.to_bits(), p.to_bits());
    }
}
