use thiserror::Error;

/// Errors surfaced by embedding providers.
///
/// Every variant means "no vector was produced". Callers must not treat any
/// of them as an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// Configuration is inconsistent (e.g. api mode without an endpoint).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// Local model assets (ONNX graph or tokenizer) are missing.
    #[error("model asset not found: {0}")]
    ModelNotFound(String),
    /// The inference endpoint could not be reached or answered with an error status.
    #[error("embedding request failed: {0}")]
    Request(String),
    /// The provider answered but the vectors are unusable.
    #[error("inference failure: {0}")]
    Inference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let err = SemanticError::InvalidConfig("api_url is required".into());
        assert!(err.to_string().contains("invalid semantic config"));
        assert!(err.to_string().contains("api_url is required"));
    }

    #[test]
    fn error_request() {
        let err = SemanticError::Request("HTTP error 503".into());
        assert!(err.to_string().contains("embedding request failed"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn error_inference() {
        let err = SemanticError::Inference("API returned 2 embeddings for 3 inputs".into());
        assert!(err.to_string().contains("inference failure"));
    }

    #[test]
    fn error_model_not_found_names_path() {
        let err = SemanticError::ModelNotFound("models/model.onnx".into());
        assert_eq!(err.to_string(), "model asset not found: models/model.onnx");
    }

    #[test]
    fn error_clone_is_equal() {
        let err = SemanticError::Request("timeout".into());
        assert_eq!(err.clone(), err);
    }
}
