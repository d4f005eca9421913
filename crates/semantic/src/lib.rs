//! txmatch semantic embeddings
//!
//! This crate turns text into dense vectors for similarity search. It is the
//! only place in txmatch that performs model inference; everything above it
//! sees an opaque [`EmbeddingProvider`].
//!
//! We support three modes:
//!
//! - **Hash mode** - Local and deterministic. Tokens are feature-hashed into a
//!   fixed-size vector, so texts sharing words land close together. This is a
//!   lexical stand-in (reported as `hash-bow-{dim}`), not a language model.
//!   No model files, no network. Good for tests and offline demos.
//! - **ONNX mode** (feature `onnx`) - Run an exported sentence-transformer
//!   such as `all-MiniLM-L6-v2` locally, with mean pooling over the attention
//!   mask.
//! - **API mode** - Call out to a feature-extraction endpoint (Hugging Face,
//!   OpenAI-compatible, or a custom `{"text": ..}` service).
//!
//! Unlike a best-effort fingerprinting pipeline, there is no silent fallback:
//! if the endpoint fails, the error reaches the caller. An empty similarity
//! result and "the search never ran" must stay distinguishable.
//!
//! ## Lifecycle
//!
//! [`LazyEmbedder`] builds the provider on first use behind a once-only
//! barrier and keeps it for the process lifetime. With `enable_caching` the
//! provider is wrapped in a [`CachingEmbedder`] so repeated document texts are
//! embedded once.
//!
//! ## Quick example
//!
//! ```
//! use semantic::{EmbeddingProvider, LazyEmbedder, SemanticConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let embedder = LazyEmbedder::new(SemanticConfig::default());
//!     let vector = embedder.embed("salary payment").await.unwrap();
//!     assert_eq!(vector.len(), 384);
//! }
//! ```

pub mod config;
pub mod error;

mod api;
mod cache;
mod hash;
mod lazy;
mod normalize;
#[cfg(feature = "onnx")]
mod onnx;
mod pooling;
mod provider;

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::info;

pub use crate::api::ApiEmbedder;
pub use crate::cache::CachingEmbedder;
pub use crate::config::SemanticConfig;
pub use crate::error::SemanticError;
pub use crate::hash::HashEmbedder;
pub use crate::lazy::LazyEmbedder;
#[cfg(feature = "onnx")]
pub use crate::onnx::OnnxEmbedder;
pub use crate::provider::EmbeddingProvider;

/// Build the provider described by `cfg`.
///
/// Validates the config, constructs the mode's provider and wraps it in a
/// [`CachingEmbedder`] when caching is enabled.
pub fn build_provider(cfg: &SemanticConfig) -> Result<Arc<dyn EmbeddingProvider>, SemanticError> {
    cfg.validate()?;

    let provider: Arc<dyn EmbeddingProvider> = match cfg.mode.as_str() {
        "hash" => with_cache(HashEmbedder::from_config(cfg)?, cfg),
        "api" => with_cache(ApiEmbedder::from_config(cfg)?, cfg),
        #[cfg(feature = "onnx")]
        "onnx" => with_cache(OnnxEmbedder::from_config(cfg)?, cfg),
        #[cfg(not(feature = "onnx"))]
        "onnx" => {
            return Err(SemanticError::InvalidConfig(
                "onnx mode requires building with the `onnx` feature".into(),
            ))
        }
        other => {
            return Err(SemanticError::InvalidConfig(format!(
                "unknown mode '{other}'"
            )))
        }
    };

    info!(
        mode = %cfg.mode,
        model = %provider.model_name(),
        caching = cfg.enable_caching,
        "embedding provider ready"
    );
    Ok(provider)
}

fn with_cache<P: EmbeddingProvider + 'static>(
    provider: P,
    cfg: &SemanticConfig,
) -> Arc<dyn EmbeddingProvider> {
    match NonZeroUsize::new(cfg.cache_capacity).filter(|_| cfg.enable_caching) {
        Some(capacity) => Arc::new(CachingEmbedder::new(provider, capacity)),
        None => Arc::new(provider),
    }
}
