use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::normalize::l2_normalize_in_place;
use crate::{EmbeddingProvider, SemanticConfig, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

impl ApiProviderKind {
    pub(crate) fn from_hint(hint: Option<&str>) -> Self {
        match hint.unwrap_or("custom").to_ascii_lowercase().as_str() {
            "hf" | "huggingface" => ApiProviderKind::HuggingFace,
            "openai" | "gpt" => ApiProviderKind::OpenAI,
            _ => ApiProviderKind::Custom,
        }
    }
}

/// Embeddings served by a remote feature-extraction endpoint.
///
/// One HTTP request per call (a batch is one request). Failures are returned
/// as-is; there is no retry.
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    provider: ApiProviderKind,
    model_name: String,
    normalize: bool,
}

impl ApiEmbedder {
    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                SemanticError::InvalidConfig("api_url is required for api mode".into())
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.api_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            auth_header: cfg.api_auth_header.clone(),
            provider: ApiProviderKind::from_hint(cfg.api_provider.as_deref()),
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
        })
    }

    async fn send(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SemanticError::Request(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Request(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::Inference(format!("Invalid JSON response: {e}")))
    }

    fn finish(&self, mut vector: Vec<f32>) -> Vec<f32> {
        if self.normalize {
            l2_normalize_in_place(&mut vector);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        let payload = build_api_payload(self.provider, &[text], &self.model_name, false);
        let response = self.send(payload).await?;
        let mut vectors = parse_embeddings_from_value(response)?;
        if vectors.len() != 1 {
            return Err(SemanticError::Inference(format!(
                "API returned {} embeddings for 1 input",
                vectors.len()
            )));
        }
        Ok(self.finish(vectors.remove(0)))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let payload = build_api_payload(self.provider, texts, &self.model_name, true);
        let response = self.send(payload).await?;
        let vectors = parse_embeddings_from_value(response)?;
        if vectors.len() != texts.len() {
            return Err(SemanticError::Inference(format!(
                "API returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors.into_iter().map(|v| self.finish(v)).collect())
    }
}

pub(crate) fn build_api_payload(
    provider: ApiProviderKind,
    texts: &[&str],
    model_name: &str,
    batch: bool,
) -> Value {
    let first = texts.first().copied().unwrap_or("");
    match provider {
        ApiProviderKind::HuggingFace => {
            if batch {
                json!({ "inputs": texts })
            } else {
                json!({ "inputs": first })
            }
        }
        ApiProviderKind::OpenAI => {
            if batch {
                json!({ "input": texts, "model": model_name })
            } else {
                json!({ "input": first, "model": model_name })
            }
        }
        ApiProviderKind::Custom => {
            if batch {
                json!({ "texts": texts })
            } else {
                json!({ "text": first })
            }
        }
    }
}

pub(crate) fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                return items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => obj
                            .remove("embedding")
                            .ok_or_else(|| {
                                SemanticError::Inference(
                                    "missing `embedding` field in data item".into(),
                                )
                            })
                            .and_then(parse_embedding_vector),
                        _ => Err(SemanticError::Inference(
                            "unexpected entry inside `data` array".into(),
                        )),
                    })
                    .collect();
            }

            Err(SemanticError::Inference(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, SemanticError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                item.as_f64().map(|x| x as f32).ok_or_else(|| {
                    SemanticError::Inference("embedding contains a non-numeric value".into())
                })
            })
            .collect(),
        _ => Err(SemanticError::Inference(
            "embedding is not an array of numbers".into(),
        )),
    }
}
