//! Workspace umbrella crate for txmatch.
//!
//! This crate stitches the record store, the embedding provider and the two
//! scorers together behind a single [`Engine`]: callers hand it a document id
//! or a query text, the engine resolves what it needs from the
//! [`RecordStore`] and returns a score-sorted outcome.
//!
//! ```no_run
//! use txmatch::{Engine, EngineConfig};
//!
//! # async fn run() -> Result<(), txmatch::EngineError> {
//! let engine = Engine::from_config(&EngineConfig::default())?;
//! let users = engine.match_users("t1")?;
//! let similar = engine.search_similar("salary payment").await?;
//! println!("{} users, {} transactions", users.total, similar.results.len());
//! # Ok(())
//! # }
//! ```

mod config;

pub use crate::config::{DEFAULT_TRANSACTIONS_PATH, DEFAULT_USERS_PATH, EngineConfig};
pub use ingest::{
    CsvSource, Document, Entity, IngestError, RecordSource, RecordStore, RecordTable,
    StaticSource,
};
pub use matcher::{
    FuzzyMatcher, MatchError, MatchOutcome, MatchResult, SearchOutcome, SimilarityResult,
    SimilaritySearch,
};
pub use semantic::{
    EmbeddingProvider, HashEmbedder, LazyEmbedder, SemanticConfig, SemanticError,
};

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

/// Errors surfaced by [`Engine`] operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller supplied an unusable request, e.g. an empty query.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The engine configuration is inconsistent.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    /// The record tables could not be loaded.
    #[error("record store error: {0}")]
    Ingest(#[from] IngestError),
    /// Scoring failed, typically because embeddings were unavailable.
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Matching engine over a lazily loaded record store.
///
/// Holds no per-request state; one instance is shared by all callers.
pub struct Engine {
    store: RecordStore,
    embedder: Arc<dyn EmbeddingProvider>,
    fuzzy: FuzzyMatcher,
    similarity: SimilaritySearch,
}

impl Engine {
    pub fn new(
        store: RecordStore,
        embedder: Arc<dyn EmbeddingProvider>,
        similarity: SimilaritySearch,
    ) -> Self {
        Self {
            store,
            embedder,
            fuzzy: FuzzyMatcher::new(),
            similarity,
        }
    }

    /// CSV-backed store and a lazily constructed embedding provider, both
    /// initialized on first use.
    pub fn from_config(cfg: &EngineConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        let store = RecordStore::new(CsvSource::new(
            cfg.users_path.clone(),
            cfg.transactions_path.clone(),
        ));
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(LazyEmbedder::new(cfg.semantic.clone()));
        let similarity = SimilaritySearch::new(cfg.similarity_threshold)?;
        Ok(Self::new(store, embedder, similarity))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.similarity.threshold()
    }

    /// Rank all entities against the text of document `document_id`.
    ///
    /// An unknown id yields an empty outcome rather than an error.
    pub fn match_users(&self, document_id: &str) -> Result<MatchOutcome, EngineError> {
        let Some(text) = self.store.document_text(document_id)? else {
            debug!(document_id, "unknown document id");
            return Ok(MatchOutcome::empty());
        };
        let entities = self.store.entities()?;
        let outcome = self.fuzzy.rank(text, entities.as_slice());
        debug!(document_id, matches = outcome.total, "ranked entities");
        Ok(outcome)
    }

    /// Rank all documents by semantic similarity to `query`.
    ///
    /// An empty query is rejected before any embedding work happens.
    pub async fn search_similar(&self, query: &str) -> Result<SearchOutcome, EngineError> {
        if query.is_empty() {
            return Err(EngineError::Validation("query must not be empty".into()));
        }
        let documents = self.store.documents()?;
        let outcome = self
            .similarity
            .search(query, documents.as_slice(), self.embedder.as_ref())
            .await?;
        debug!(
            results = outcome.results.len(),
            tokens = outcome.token_count,
            "ranked documents"
        );
        Ok(outcome)
    }

    /// Load both record tables and build the embedding provider now instead
    /// of on the first request.
    pub fn warm_up(&self) -> Result<(), EngineError> {
        self.store.preload()?;
        self.embedder.warm_up().map_err(MatchError::from)?;
        Ok(())
    }

    /// Whether both tables are loaded and the embedder is built.
    pub fn is_ready(&self) -> bool {
        self.store.is_loaded() && self.embedder.is_ready()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("store", &self.store)
            .field("model", &self.embedder.model_name())
            .field("similarity", &self.similarity)
            .finish()
    }
}
