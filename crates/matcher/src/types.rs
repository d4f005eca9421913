use semantic::SemanticError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An entity whose label plausibly appears in a document's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub entity_id: String,
    /// Confidence in [0, 1], rounded to two decimals.
    pub score: f32,
}

/// A document whose text is semantically close to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub document_id: String,
    /// Normalized cosine similarity in [0, 1], rounded to two decimals.
    pub score: f32,
}

/// Ranked output of [`FuzzyMatcher::rank`](crate::FuzzyMatcher::rank).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Sorted by score, descending; equal scores keep entity load order.
    pub matches: Vec<MatchResult>,
    /// Always `matches.len()`.
    pub total: usize,
}

impl MatchOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: Vec<MatchResult>) -> Self {
        let total = matches.len();
        Self { matches, total }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Ranked output of [`SimilaritySearch::search`](crate::SimilaritySearch::search).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Sorted by score, descending; all scores are above the threshold.
    pub results: Vec<SimilarityResult>,
    /// Whitespace token count of the query. Approximate, not a model tokenizer.
    pub token_count: usize,
}

/// Errors produced by the scoring layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid configuration, e.g. a threshold outside [0, 1].
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// The embedding provider could not produce vectors.
    #[error("embedding failed: {0}")]
    Embedding(#[from] SemanticError),
    /// A document vector does not have the query vector's length.
    #[error("embedding dimension mismatch for document {document_id}: expected {expected}, got {got}")]
    DimensionMismatch {
        document_id: String,
        expected: usize,
        got: usize,
    },
}
