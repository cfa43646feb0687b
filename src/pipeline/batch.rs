// Batch analysis — messages in, one flag per message out.
//
// Stages run in a fixed order with a hard barrier after tokenization: the
// vocabulary is frozen over the whole batch before any vector exists.
//
//   normalize -> TF-IDF index -> vectors -> pairwise cosine -> classify
//
// No I/O happens here apart from the optional progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::classify::Classifier;
use crate::error::{AnalysisError, Result};
use crate::message::Message;
use crate::similarity::engine::{pair_count, PopulateStats, SimilarityEngine};
use crate::similarity::matrix::SimilarityMatrix;
use crate::text::normalize::TextNormalizer;
use crate::text::traits::Tokenizer;
use crate::tfidf::index::{TfIdfIndex, Vector};

/// Caller-supplied parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Scores strictly above this make two messages similar (default 0.32)
    pub threshold: f64,
    /// Similar peers allowed before a message is flagged (default 0)
    pub max_similar_peers: usize,
    /// Spread pairwise scoring over rayon's thread pool
    pub parallel: bool,
    /// Draw a progress bar on stderr while scoring pairs
    pub show_progress: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            threshold: 0.32,
            max_similar_peers: 0,
            parallel: true,
            show_progress: false,
        }
    }
}

/// The outcome for a single message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageVerdict {
    pub index: usize,
    pub flagged: bool,
    /// Peers scoring strictly above the threshold, ascending
    pub similar_peers: Vec<usize>,
}

/// Everything a run produced. The flags are the result; the rest is kept
/// for diagnostics and reporting.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub verdicts: Vec<MessageVerdict>,
    pub index: TfIdfIndex,
    pub vectors: Vec<Vector>,
    pub matrix: SimilarityMatrix,
    pub stats: PopulateStats,
}

impl Analysis {
    /// One flag per message, aligned with input order.
    pub fn flags(&self) -> Vec<bool> {
        self.verdicts.iter().map(|v| v.flagged).collect()
    }

    pub fn flagged_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.flagged).count()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.index.vocabulary().len()
    }
}

/// Tokenize every message. Fails on an empty batch or a message with no
/// tokens rather than dropping it.
pub fn tokenize_batch(messages: &[Message], tokenizer: &impl Tokenizer) -> Result<Vec<Vec<String>>> {
    if messages.is_empty() {
        return Err(AnalysisError::invalid("message batch is empty"));
    }

    messages
        .iter()
        .map(|m| {
            let tokens = tokenizer.tokenize(&m.body);
            if tokens.is_empty() {
                warn!(message = m.index, "Message body has no tokens");
                return Err(AnalysisError::invalid(format!(
                    "message {} has no tokens",
                    m.index
                )));
            }
            Ok(tokens)
        })
        .collect()
}

/// Tokenize a batch and build its TF-IDF index, stopping before any pair
/// is scored.
pub fn build_index(messages: &[Message]) -> Result<TfIdfIndex> {
    let corpus = tokenize_batch(messages, &TextNormalizer)?;
    TfIdfIndex::build(&corpus)
}

/// Run the full analysis over a batch.
pub fn analyze(messages: &[Message], params: &RunParams) -> Result<Analysis> {
    // Reject bad parameters before doing any work
    let classifier = Classifier::new(params.threshold, params.max_similar_peers)?;

    let index = build_index(messages)?;
    let vectors = index.vectors()?;

    info!(
        messages = messages.len(),
        unique_terms = index.vocabulary().len(),
        pairs = pair_count(messages.len()),
        "Scoring message pairs"
    );

    let mut matrix = SimilarityMatrix::new(messages.len());
    let mut engine = SimilarityEngine::new();
    let pb = if params.show_progress {
        let pb = ProgressBar::new(pair_count(messages.len()) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Pairs [{bar:30}] {pos}/{len} ({eta})")
                .unwrap(),
        );
        engine = engine.with_progress(pb.clone());
        Some(pb)
    } else {
        None
    };

    let stats = if params.parallel {
        engine.populate_parallel(&vectors, &mut matrix)?
    } else {
        engine.populate(&vectors, &mut matrix)?
    };
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let flags = classifier.classify(&matrix)?;
    let verdicts = flags
        .into_iter()
        .enumerate()
        .map(|(i, flagged)| -> Result<MessageVerdict> {
            Ok(MessageVerdict {
                index: messages[i].index,
                flagged,
                similar_peers: classifier.similar_peers(&matrix, i)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let analysis = Analysis {
        verdicts,
        index,
        vectors,
        matrix,
        stats,
    };
    info!(
        flagged = analysis.flagged_count(),
        total = messages.len(),
        "Classification complete"
    );
    Ok(analysis)
}

/// The core as a pure function: messages and parameters in, flags out.
pub fn classify_messages(
    messages: &[Message],
    threshold: f64,
    max_similar_peers: usize,
) -> Result<Vec<bool>> {
    let params = RunParams {
        threshold,
        max_similar_peers,
        ..RunParams::default()
    };
    Ok(analyze(messages, &params)?.flags())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::from_bodies;

    #[test]
    fn test_reference_batch() {
        let messages = from_bodies(&[
            "This is email 1.",
            "This is email 2.",
            "Email 3 has some unique words.",
        ]);
        let flags = classify_messages(&messages, 0.32, 0).unwrap();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_verdicts_carry_peers() {
        let messages = from_bodies(&[
            "This is email 1.",
            "This is email 2.",
            "Email 3 has some unique words.",
        ]);
        let analysis = analyze(&messages, &RunParams::default()).unwrap();
        assert_eq!(analysis.verdicts[0].similar_peers, vec![1]);
        assert_eq!(analysis.verdicts[1].similar_peers, vec![0]);
        assert!(analysis.verdicts[2].similar_peers.is_empty());
        assert_eq!(analysis.stats.computed, 3);
        assert_eq!(analysis.vocabulary_size(), 10);
    }

    #[test]
    fn test_build_index_matches_analysis() {
        let messages = from_bodies(&[
            "This is email 1.",
            "This is email 2.",
            "Email 3 has some unique words.",
        ]);
        let index = build_index(&messages).unwrap();
        let analysis = analyze(&messages, &RunParams::default()).unwrap();
        assert_eq!(index.message_count(), 3);
        assert_eq!(index.vocabulary().terms(), analysis.index.vocabulary().terms());
        assert_eq!(
            index.top_terms(2, 3).unwrap(),
            analysis.index.top_terms(2, 3).unwrap()
        );
        assert!(matches!(
            build_index(&[]),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(
            analyze(&[], &RunParams::default()),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_token_message_rejected() {
        let messages = from_bodies(&["hello world", "   "]);
        assert!(matches!(
            analyze(&messages, &RunParams::default()),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_bad_threshold_rejected() {
        let messages = from_bodies(&["hello world"]);
        let params = RunParams {
            threshold: f64::NAN,
            ..RunParams::default()
        };
        assert!(analyze(&messages, &params).is_err());
    }
}
