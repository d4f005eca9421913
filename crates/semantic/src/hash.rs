use async_trait::async_trait;
use fxhash::hash64;

use crate::normalize::l2_normalize_in_place;
use crate::{EmbeddingProvider, SemanticConfig, SemanticError};

/// Deterministic bag-of-words embedder used when no model endpoint is configured.
///
/// Each lower-cased token (edge punctuation stripped) is hashed into one of
/// `dimension` buckets with a hash-derived sign. Texts sharing vocabulary point
/// in similar directions, so cosine similarity stays meaningful without any
/// model assets. Empty or punctuation-only text embeds to the zero vector.
#[derive(Debug, Clone, PartialEq)]
pub struct HashEmbedder {
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            model_name: format!("hash-bow-{dimension}"),
            dimension,
            normalize: true,
        }
    }

    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        if cfg.dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        Ok(Self {
            model_name: cfg.provider_label(),
            dimension: cfg.dimension,
            normalize: cfg.normalize,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub(crate) fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dimension];
        for raw in text.split_whitespace() {
            let token = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if token.is_empty() {
                continue;
            }
            let h = hash64(token.as_bytes());
            let idx = (h % self.dimension as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn dimension_matches_config() {
        let cfg = SemanticConfig {
            dimension: 64,
            ..Default::default()
        };
        let embedder = HashEmbedder::from_config(&cfg).unwrap();
        assert_eq!(embedder.embed_text("hello world").len(), 64);
        assert_eq!(embedder.model_name(), "hash-bow-64");
    }

    #[test]
    fn deterministic() {
        let embedder = HashEmbedder::new(128);
        assert_eq!(
            embedder.embed_text("salary payment"),
            embedder.embed_text("salary payment")
        );
    }

    #[test]
    fn case_and_punctuation_insensitive() {
        let embedder = HashEmbedder::new(128);
        assert_eq!(
            embedder.embed_text("Salary, payment!"),
            embedder.embed_text("salary payment")
        );
    }

    #[test]
    fn shared_tokens_are_closer_than_disjoint_ones() {
        let embedder = HashEmbedder::new(384);
        let query = embedder.embed_text("salary payment");
        let related = embedder.embed_text("monthly salary payment for contractor");
        let unrelated = embedder.embed_text("coffee beans");
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn identical_text_has_unit_cosine() {
        let embedder = HashEmbedder::new(384);
        let v = embedder.embed_text("liam johnson");
        assert!((dot(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16);
        assert!(embedder.embed_text("").iter().all(|&x| x == 0.0));
        assert!(embedder.embed_text(" ... ").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_dimension_rejected() {
        let cfg = SemanticConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(HashEmbedder::from_config(&cfg).is_err());
    }

    #[tokio::test]
    async fn batch_matches_single_calls() {
        let embedder = HashEmbedder::new(32);
        let batch = embedder.embed_batch(&["a b", "c"]).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("a b").await.unwrap());
        assert_eq!(batch[1], embedder.embed("c").await.unwrap());
    }
}
