// Threshold classifier.
//
// A message is flagged when the number of peers it is similar to (score
// strictly above the threshold) exceeds the allowed peer count. Row scans
// stop as soon as the limit is passed; the outcome only depends on the total
// count, so stopping early never changes the answer.

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::similarity::matrix::SimilarityMatrix;

/// Run parameters for classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    /// Peers scoring strictly above this count as similar. Held at the
    /// matrix's cell precision so a cell equal to the threshold never passes.
    pub threshold: f32,
    /// Similar peers a message may have before it gets flagged
    pub max_similar_peers: usize,
}

impl Classifier {
    /// Validate and build a classifier. The threshold must be finite and
    /// within [0, 1].
    pub fn new(threshold: f64, max_similar_peers: usize) -> Result<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(AnalysisError::invalid(format!(
                "similarity threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            threshold: threshold as f32,
            max_similar_peers,
        })
    }

    /// One flag per message, aligned with batch order.
    ///
    /// Every off-diagonal cell must already be computed.
    pub fn classify(&self, matrix: &SimilarityMatrix) -> Result<Vec<bool>> {
        check_complete(matrix)?;
        let n = matrix.size();
        let mut flags = vec![false; n];

        for (i, flag) in flags.iter_mut().enumerate() {
            let mut similar = 0usize;
            for j in (0..n).filter(|&j| j != i) {
                if self.is_similar(matrix.get(i, j)?) {
                    similar += 1;
                    debug!(message = i, peer = j, "Message is similar to peer");
                }
                if similar > self.max_similar_peers {
                    *flag = true;
                    debug!(message = i, similar, "Message flagged");
                    break;
                }
            }
        }
        Ok(flags)
    }

    /// Every peer of `message` scoring strictly above the threshold, ascending.
    pub fn similar_peers(&self, matrix: &SimilarityMatrix, message: usize) -> Result<Vec<usize>> {
        let n = matrix.size();
        let mut peers = Vec::new();
        for j in (0..n).filter(|&j| j != message) {
            if self.is_similar(matrix.get(message, j)?) {
                peers.push(j);
            }
        }
        Ok(peers)
    }

    fn is_similar(&self, score: f32) -> bool {
        score > self.threshold
    }
}

/// Classify with a fresh `Classifier`.
pub fn classify(
    matrix: &SimilarityMatrix,
    threshold: f64,
    max_similar_peers: usize,
) -> Result<Vec<bool>> {
    Classifier::new(threshold, max_similar_peers)?.classify(matrix)
}

fn check_complete(matrix: &SimilarityMatrix) -> Result<()> {
    let missing = matrix.packed().len() - matrix.computed_cells();
    if missing > 0 {
        return Err(AnalysisError::invalid(format!(
            "{missing} similarity cells have not been computed"
        )));
    }
    Ok(())
}
