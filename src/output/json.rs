// JSON report — machine-readable counterpart of the terminal table.

use serde::Serialize;

use crate::message::Message;
use crate::pipeline::batch::Analysis;
use crate::similarity::engine::PopulateStats;
use crate::similarity::matrix::SimilarityMatrix;

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub threshold: f64,
    pub max_similar_peers: usize,
    pub message_count: usize,
    pub flagged_count: usize,
    pub vocabulary_size: usize,
    pub pairs: PopulateStats,
    pub messages: Vec<MessageReport<'a>>,
    /// Packed lower triangle; unset cells serialize as null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<&'a SimilarityMatrix>,
}

#[derive(Debug, Serialize)]
pub struct MessageReport<'a> {
    pub index: usize,
    pub receiver: &'a str,
    pub flagged: bool,
    pub similar_peers: &'a [usize],
}

impl<'a> Report<'a> {
    pub fn new(
        messages: &'a [Message],
        analysis: &'a Analysis,
        threshold: f64,
        max_similar_peers: usize,
        include_matrix: bool,
    ) -> Self {
        Self {
            threshold,
            max_similar_peers,
            message_count: messages.len(),
            flagged_count: analysis.flagged_count(),
            vocabulary_size: analysis.vocabulary_size(),
            pairs: analysis.stats,
            messages: messages
                .iter()
                .zip(&analysis.verdicts)
                .map(|(m, v)| MessageReport {
                    index: v.index,
                    receiver: &m.receiver,
                    flagged: v.flagged,
                    similar_peers: &v.similar_peers,
                })
                .collect(),
            matrix: include_matrix.then_some(&analysis.matrix),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
