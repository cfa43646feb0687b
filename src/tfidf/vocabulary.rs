// Corpus vocabulary — grows while messages are scanned, then freezes.
//
// The frozen order is the index space for every vector built in a run.
// Each freeze stamps a fresh snapshot id so vectors built against two
// different vocabularies can never be compared by accident.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SNAPSHOT: AtomicU64 = AtomicU64::new(1);

/// Accumulates distinct terms in first-seen order.
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every token of one message.
    pub fn observe(&mut self, tokens: &[String]) {
        for token in tokens {
            if !self.positions.contains_key(token) {
                self.positions.insert(token.clone(), self.terms.len());
                self.terms.push(token.clone());
            }
        }
    }

    /// Fix the enumeration order. The builder is consumed, so the
    /// vocabulary cannot grow afterwards.
    pub fn freeze(self) -> Vocabulary {
        Vocabulary {
            terms: self.terms,
            positions: self.positions,
            snapshot: NEXT_SNAPSHOT.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// An immutable, ordered set of terms.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
    snapshot: u64,
}

impl Vocabulary {
    /// Build and freeze a vocabulary from a tokenized corpus in one pass.
    pub fn from_corpus(corpus: &[Vec<String>]) -> Self {
        let mut builder = VocabularyBuilder::new();
        for tokens in corpus {
            builder.observe(tokens);
        }
        builder.freeze()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Position of `term` in the frozen order.
    pub fn position(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Identity of this frozen vocabulary.
    pub fn snapshot(&self) -> u64 {
        self.snapshot
    }
}
