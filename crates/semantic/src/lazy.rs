use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;

use crate::{build_provider, EmbeddingProvider, SemanticConfig, SemanticError};

/// Process-wide embedding handle built on first use, exactly once.
///
/// Concurrent first callers block on the same construction. A failed
/// construction is returned to the caller and attempted again on the next
/// call; a successful one is kept for the life of the handle.
pub struct LazyEmbedder {
    cfg: SemanticConfig,
    label: String,
    handle: OnceCell<Arc<dyn EmbeddingProvider>>,
}

impl LazyEmbedder {
    pub fn new(cfg: SemanticConfig) -> Self {
        Self {
            label: cfg.provider_label(),
            cfg,
            handle: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &SemanticConfig {
        &self.cfg
    }

    /// The underlying provider, constructing it if needed.
    pub fn handle(&self) -> Result<&Arc<dyn EmbeddingProvider>, SemanticError> {
        self.handle.get_or_try_init(|| build_provider(&self.cfg))
    }
}

#[async_trait]
impl EmbeddingProvider for LazyEmbedder {
    /// Known before the provider is built, so readiness probes can report it.
    fn model_name(&self) -> &str {
        &self.label
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        let provider = self.handle()?.clone();
        provider.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let provider = self.handle()?.clone();
        provider.embed_batch(texts).await
    }

    fn warm_up(&self) -> Result<(), SemanticError> {
        self.handle()?.warm_up()
    }

    /// Whether the provider has been constructed.
    fn is_ready(&self) -> bool {
        self.handle.get().is_some()
    }
}
