use std::sync::Arc;

use async_trait::async_trait;

use crate::SemanticError;

/// The only component allowed to perform model inference.
///
/// Implementations must be deterministic for a fixed model: the same text
/// yields the same vector on every call.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Label of the model producing the vectors.
    fn model_name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError>;

    /// Embed many texts, returning exactly one vector per input in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Construct any lazily built state now. Providers without such state
    /// are always ready.
    fn warm_up(&self) -> Result<(), SemanticError> {
        Ok(())
    }

    /// Whether the provider can serve requests without further setup.
    fn is_ready(&self) -> bool {
        true
    }
}

#[async_trait]
impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        (**self).embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        (**self).embed_batch(texts).await
    }

    fn warm_up(&self) -> Result<(), SemanticError> {
        (**self).warm_up()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
