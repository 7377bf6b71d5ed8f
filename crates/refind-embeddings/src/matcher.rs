//! Similarity matching of a live-frame embedding against stored references.

use refind_core::MATCH_THRESHOLD;

use crate::normalize::cosine_similarity;

/// Result of comparing one query vector against a reference set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchOutcome {
    /// Maximum cosine similarity observed. 0.0 when the reference set is
    /// empty or the query has zero norm.
    pub best_score: f32,
    /// Index of the best reference (first-seen wins ties). `None` when the
    /// reference set is empty.
    pub best_index: Option<usize>,
}

impl MatchOutcome {
    /// Whether the best score clears the match threshold.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.best_index.is_some() && self.best_score >= MATCH_THRESHOLD
    }
}

/// Compare `query` against every reference and pick the maximum cosine
/// similarity. Degenerate inputs (empty references, zero-norm query) yield
/// score 0 and no match — never an error.
pub fn best_match(query: &[f32], references: &[Vec<f32>]) -> MatchOutcome {
    let mut best_score = 0.0f32;
    let mut best_index: Option<usize> = None;

    for (i, reference) in references.iter().enumerate() {
        let score = cosine_similarity(query, reference);
        // strict comparison: ties resolve to the first-seen reference
        if best_index.is_none() || score > best_score {
            best_score = score;
            best_index = Some(i);
        }
    }

    MatchOutcome {
        best_score,
        best_index,
    }
}
