//! Engine configuration.
//!
//! `EngineConfig` is plain serde data so it can be embedded in the server's
//! layered configuration (file + `TXMATCH__ENGINE__*` environment variables)
//! or built directly in code:
//!
//! ```
//! use txmatch::EngineConfig;
//!
//! let cfg = EngineConfig {
//!     users_path: "fixtures/users.csv".into(),
//!     similarity_threshold: 0.4,
//!     ..Default::default()
//! };
//! assert!(cfg.validate().is_ok());
//! ```

use std::path::PathBuf;

use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Default location of the entity (users) CSV.
pub const DEFAULT_USERS_PATH: &str = "data/users.csv";
/// Default location of the document (transactions) CSV.
pub const DEFAULT_TRANSACTIONS_PATH: &str = "data/transactions.csv";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// CSV with `id,name` columns.
    pub users_path: PathBuf,
    /// CSV with `id,description` columns.
    pub transactions_path: PathBuf,
    /// Documents must score strictly above this to be returned by search.
    pub similarity_threshold: f32,
    /// Embedding provider settings.
    pub semantic: SemanticConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            users_path: PathBuf::from(DEFAULT_USERS_PATH),
            transactions_path: PathBuf::from(DEFAULT_TRANSACTIONS_PATH),
            similarity_threshold: matcher::DEFAULT_THRESHOLD,
            semantic: SemanticConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.users_path.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig(
                "users_path must not be empty".into(),
            ));
        }
        if self.transactions_path.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig(
                "transactions_path must not be empty".into(),
            ));
        }
        if !self.similarity_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(EngineError::InvalidConfig(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        self.semantic
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }
}
