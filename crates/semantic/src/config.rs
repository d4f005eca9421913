use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::SemanticError;

/// Runtime configuration describing which provider to build and how to
/// post-process vectors.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig {
///     mode: "api".into(),
///     api_url: Some("https://router.huggingface.co/hf-inference/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction".into()),
///     api_auth_header: Some("Bearer hf_xxx".into()),
///     api_provider: Some("hf".into()),
///     ..Default::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Provider selector: `"hash"` (local, deterministic bag of words),
    /// `"onnx"` (local transformer, needs the `onnx` feature) or `"api"`
    /// (remote HTTP).
    pub mode: String,
    /// Model label for `"onnx"` and `"api"`; also sent as `model` to
    /// OpenAI-style endpoints. Hash mode reports `hash-bow-{dimension}`.
    pub model_name: String,
    /// Vector length produced in hash mode. Models dictate their own.
    pub dimension: usize,
    /// Exported ONNX graph for `"onnx"` mode.
    pub model_path: PathBuf,
    /// `tokenizer.json` matching [`model_path`](Self::model_path).
    pub tokenizer_path: PathBuf,
    /// Token budget per text in `"onnx"` mode; longer inputs are truncated.
    pub max_sequence_length: usize,
    /// Inference endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Authorization header (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: u64,
    /// Normalize vectors to unit length. Cosine similarity is unaffected.
    pub normalize: bool,
    /// Keep an LRU cache of vectors keyed by input text.
    pub enable_caching: bool,
    /// Maximum number of cached vectors.
    pub cache_capacity: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "hash".into(),
            model_name: "all-MiniLM-L6-v2".into(),
            dimension: 384,
            model_path: PathBuf::from("models/all-MiniLM-L6-v2/onnx/model.onnx"),
            tokenizer_path: PathBuf::from("models/all-MiniLM-L6-v2/tokenizer.json"),
            max_sequence_length: 256,
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: 30,
            normalize: true,
            enable_caching: true,
            cache_capacity: 4096,
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> Result<(), SemanticError> {
        match self.mode.as_str() {
            "hash" => {
                if self.dimension == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "dimension must be greater than zero".into(),
                    ));
                }
            }
            "onnx" => {
                if self.model_path.as_os_str().is_empty()
                    || self.tokenizer_path.as_os_str().is_empty()
                {
                    return Err(SemanticError::InvalidConfig(
                        "model_path and tokenizer_path are required for onnx mode".into(),
                    ));
                }
                if self.max_sequence_length == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "max_sequence_length must be greater than zero".into(),
                    ));
                }
            }
            "api" => {
                if self.api_url.as_deref().map_or(true, |url| url.trim().is_empty()) {
                    return Err(SemanticError::InvalidConfig(
                        "api_url is required for api mode".into(),
                    ));
                }
                if self.api_timeout_secs == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "api_timeout_secs must be greater than zero".into(),
                    ));
                }
            }
            other => {
                return Err(SemanticError::InvalidConfig(format!(
                    "unknown mode '{other}', expected 'hash', 'onnx' or 'api'"
                )))
            }
        }
        if self.enable_caching && self.cache_capacity == 0 {
            return Err(SemanticError::InvalidConfig(
                "cache_capacity must be greater than zero when caching is enabled".into(),
            ));
        }
        Ok(())
    }

    /// Name of the model whose vectors this config produces.
    pub fn provider_label(&self) -> String {
        match self.mode.as_str() {
            "hash" => format!("hash-bow-{}", self.dimension),
            _ => self.model_name.clone(),
        }
    }
}
