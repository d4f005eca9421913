use ingest::Document;
use semantic::{EmbeddingProvider, SemanticError};

use crate::rank::{round_score, sort_desc_stable};
use crate::text::token_count;
use crate::types::{MatchError, SearchOutcome, SimilarityResult};

/// Default minimum normalized similarity a document must exceed.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Added to the norm product so zero vectors score 0 instead of NaN.
pub const COSINE_EPSILON: f32 = 1e-10;

/// Raw cosine similarity in [-1, 1], guarded against zero-norm inputs.
///
/// Callers must pass vectors of equal length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    (dot / (norm_a * norm_b + COSINE_EPSILON)).clamp(-1.0, 1.0)
}

/// Map a cosine in [-1, 1] onto [0, 1]. Strictly monotonic.
pub fn normalize_cosine(cosine: f32) -> f32 {
    (cosine + 1.0) / 2.0
}

/// Ranks documents by embedding proximity to a free-text query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilaritySearch {
    threshold: f32,
    /// `threshold` as the decimal it prints as, widened to f64.
    cutoff: f64,
}

impl Default for SimilaritySearch {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }
}

impl SimilaritySearch {
    /// `threshold` must be a finite value in [0, 1].
    pub fn new(threshold: f32) -> Result<Self, MatchError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(MatchError::InvalidConfig(format!(
                "similarity threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(Self::with_threshold(threshold))
    }

    fn with_threshold(threshold: f32) -> Self {
        let cutoff = threshold
            .to_string()
            .parse()
            .unwrap_or(f64::from(threshold));
        Self { threshold, cutoff }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Strictly-above test in f64 against the decimal threshold, so an f32
    /// score equal to `0.3f32` (0.30000001..) clears a `0.3` threshold.
    pub fn keeps(&self, score: f32) -> bool {
        f64::from(score) > self.cutoff
    }

    /// Embed the query and every document, keep documents whose normalized
    /// similarity is strictly above the threshold, best first.
    ///
    /// The query is embedded once and the documents with a single batch call.
    /// With no documents the provider is not called at all. Provider failures
    /// are returned, never turned into an empty result.
    pub async fn search<P>(
        &self,
        query: &str,
        documents: &[Document],
        embedder: &P,
    ) -> Result<SearchOutcome, MatchError>
    where
        P: EmbeddingProvider + ?Sized,
    {
        let token_count = token_count(query);
        if documents.is_empty() {
            return Ok(SearchOutcome {
                results: Vec::new(),
                token_count,
            });
        }

        let query_vector = embedder.embed(query).await?;
        let texts: Vec<&str> = documents.iter().map(|doc| doc.text.as_str()).collect();
        let doc_vectors = embedder.embed_batch(&texts).await?;
        if doc_vectors.len() != documents.len() {
            return Err(MatchError::Embedding(SemanticError::Inference(format!(
                "provider returned {} embeddings for {} documents",
                doc_vectors.len(),
                documents.len()
            ))));
        }

        let mut results = Vec::new();
        for (doc, vector) in documents.iter().zip(&doc_vectors) {
            if vector.len() != query_vector.len() {
                return Err(MatchError::DimensionMismatch {
                    document_id: doc.id.clone(),
                    expected: query_vector.len(),
                    got: vector.len(),
                });
            }
            let score = normalize_cosine(cosine_similarity(&query_vector, vector));
            if self.keeps(score) {
                results.push(SimilarityResult {
                    document_id: doc.id.clone(),
                    score: round_score(f64::from(score)) as f32,
                });
            }
        }

        sort_desc_stable(&mut results, |r| f64::from(r.score));
        Ok(SearchOutcome {
            results,
            token_count,
        })
    }
}
