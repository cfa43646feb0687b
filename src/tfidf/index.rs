// Dense TF-IDF index.
//
// Weights live in one flat table keyed by (vocabulary index, message index),
// so a term that never occurs in a message reads as an explicit 0 rather than
// a missing map entry.
//
//   tf  = occurrences(term, message) / tokens(message)
//   idf = 1 + log10(corpus_size / document_frequency(term))

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use super::vocabulary::Vocabulary;
use crate::error::{AnalysisError, Result};

/// A message's weights over a frozen vocabulary, one entry per term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vector {
    values: Vec<f32>,
    snapshot: u64,
}

impl Vector {
    /// Wrap raw values built against the vocabulary with id `snapshot`.
    pub fn new(values: Vec<f32>, snapshot: u64) -> Self {
        Self { values, snapshot }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn snapshot(&self) -> u64 {
        self.snapshot
    }
}

/// TF-IDF weights for every (term, message) pair of one corpus.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    vocabulary: Vocabulary,
    /// `weights[term * message_count + message]`
    weights: Vec<f32>,
    token_counts: Vec<usize>,
    doc_freq: Vec<usize>,
}

impl TfIdfIndex {
    /// Freeze the corpus vocabulary and compute every weight.
    ///
    /// Messages with zero tokens are allowed here (their columns stay 0), but
    /// asking for their weights or vectors fails with `InvalidInput`.
    pub fn build(corpus: &[Vec<String>]) -> Result<Self> {
        if corpus.is_empty() {
            return Err(AnalysisError::invalid("corpus contains no messages"));
        }

        let vocabulary = Vocabulary::from_corpus(corpus);
        let n = corpus.len();
        let v = vocabulary.len();

        // Per-message occurrence counts keyed by vocabulary position
        let mut doc_freq = vec![0usize; v];
        let mut occurrences: Vec<HashMap<usize, usize>> = Vec::with_capacity(n);
        for tokens in corpus {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for token in tokens {
                if let Some(pos) = vocabulary.position(token) {
                    *counts.entry(pos).or_insert(0) += 1;
                }
            }
            for &pos in counts.keys() {
                doc_freq[pos] += 1;
            }
            occurrences.push(counts);
        }

        let mut weights = vec![0.0f32; v * n];
        for (message, counts) in occurrences.iter().enumerate() {
            let total = corpus[message].len();
            for (&term, &count) in counts {
                let w = tf(count, total) * idf(n, doc_freq[term]);
                weights[term * n + message] = w as f32;
            }
        }

        info!(
            messages = n,
            vocabulary = v,
            snapshot = vocabulary.snapshot(),
            "Built TF-IDF index"
        );

        Ok(Self {
            vocabulary,
            weights,
            token_counts: corpus.iter().map(|t| t.len()).collect(),
            doc_freq,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn message_count(&self) -> usize {
        self.token_counts.len()
    }

    /// Number of messages containing `term` at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.vocabulary
            .position(term)
            .map(|pos| self.doc_freq[pos])
            .unwrap_or(0)
    }

    /// TF-IDF weight of `term` in message `message`.
    pub fn term_weight(&self, term: &str, message: usize) -> Result<f32> {
        self.check_message(message)?;
        let pos = self
            .vocabulary
            .position(term)
            .ok_or_else(|| AnalysisError::UndefinedTerm {
                term: term.to_string(),
            })?;
        Ok(self.weights[pos * self.message_count() + message])
    }

    /// Dense vector for one message in the frozen vocabulary order.
    pub fn vector_for(&self, message: usize) -> Result<Vector> {
        self.check_message(message)?;
        let n = self.message_count();
        let values: Vec<f32> = (0..self.vocabulary.len())
            .map(|term| self.weights[term * n + message])
            .collect();

        debug!(message, dimensions = values.len(), "Built message vector");
        Ok(Vector::new(values, self.vocabulary.snapshot()))
    }

    /// Vectors for every message, in batch order.
    pub fn vectors(&self) -> Result<Vec<Vector>> {
        (0..self.message_count()).map(|m| self.vector_for(m)).collect()
    }

    /// The `limit` highest-weighted terms of a message, heaviest first.
    pub fn top_terms(&self, message: usize, limit: usize) -> Result<Vec<(String, f32)>> {
        let vector = self.vector_for(message)?;
        let mut ranked: Vec<(String, f32)> = vector
            .values()
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(pos, &w)| (self.vocabulary.terms()[pos].clone(), w))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);
        Ok(ranked)
    }

    fn check_message(&self, message: usize) -> Result<()> {
        match self.token_counts.get(message) {
            None => Err(AnalysisError::invalid(format!(
                "message index {message} outside batch of {}",
                self.message_count()
            ))),
            Some(0) => Err(AnalysisError::invalid(format!(
                "message {message} has no tokens"
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// TF-IDF weight of `term` in one tokenized message, against a tokenized corpus.
///
/// This is the direct, unindexed form of the formula. It scans the corpus on
/// every call, so the pipeline uses `TfIdfIndex` instead.
pub fn term_weight(term: &str, message: &[String], corpus: &[Vec<String>]) -> Result<f64> {
    if message.is_empty() {
        return Err(AnalysisError::invalid("message has no tokens"));
    }

    let count = message.iter().filter(|t| t.as_str() == term).count();
    let df = corpus
        .iter()
        .filter(|tokens| tokens.iter().any(|t| t.as_str() == term))
        .count();
    if df == 0 {
        return Err(AnalysisError::UndefinedTerm {
            term: term.to_string(),
        });
    }

    Ok(tf(count, message.len()) * idf(corpus.len(), df))
}

fn tf(count: usize, total: usize) -> f64 {
    count as f64 / total as f64
}

fn idf(corpus_size: usize, doc_freq: usize) -> f64 {
    1.0 + (corpus_size as f64 / doc_freq as f64).log10()
}
