use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ndarray::Array2;
use ort::{GraphOptimizationLevel, Session};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::normalize::l2_normalize_in_place;
use crate::pooling::{pool_output, PaddedBatch};
use crate::{EmbeddingProvider, SemanticConfig, SemanticError};

/// Local sentence-transformer inference over an exported ONNX graph.
///
/// Texts are tokenized with the model's `tokenizer.json`, truncated to
/// `max_sequence_length`, padded per batch and run through the session.
/// A `[batch, seq, hidden]` output is mean-pooled over the attention mask,
/// matching sentence-transformers' default pooling.
pub struct OnnxEmbedder {
    model: Arc<OnnxModel>,
}

struct OnnxModel {
    model_name: String,
    session: Session,
    tokenizer: Tokenizer,
    max_sequence_length: usize,
    normalize: bool,
    token_type_ids: bool,
}

impl OnnxEmbedder {
    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        if !cfg.model_path.exists() {
            return Err(SemanticError::ModelNotFound(cfg.model_path.display().to_string()));
        }
        if !cfg.tokenizer_path.exists() {
            return Err(SemanticError::ModelNotFound(
                cfg.tokenizer_path.display().to_string(),
            ));
        }

        let tokenizer = Tokenizer::from_file(&cfg.tokenizer_path)
            .map_err(|e| SemanticError::InvalidConfig(format!("tokenizer: {e}")))?;
        let session = load_session(&cfg.model_path)?;
        let token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        info!(
            model = %cfg.model_name,
            path = %cfg.model_path.display(),
            token_type_ids,
            "loaded onnx model"
        );
        Ok(Self {
            model: Arc::new(OnnxModel {
                model_name: cfg.model_name.clone(),
                session,
                tokenizer,
                max_sequence_length: cfg.max_sequence_length,
                normalize: cfg.normalize,
                token_type_ids,
            }),
        })
    }
}

fn load_session(path: &Path) -> Result<Session, SemanticError> {
    let model_err = |e: ort::Error| SemanticError::InvalidConfig(format!("onnx model: {e}"));
    Session::builder()
        .map_err(model_err)?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(model_err)?
        .commit_from_file(path)
        .map_err(model_err)
}

impl OnnxModel {
    fn run(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| SemanticError::Inference(e.to_string()))?;
        let rows: Vec<(Vec<u32>, Vec<u32>)> = encodings
            .iter()
            .map(|enc| (enc.get_ids().to_vec(), enc.get_attention_mask().to_vec()))
            .collect();
        let padded = PaddedBatch::new(&rows, self.max_sequence_length)?;
        debug!(batch = padded.batch, seq_len = padded.seq_len, "running onnx session");

        let shape = (padded.batch, padded.seq_len);
        let tensor = |data: Vec<i64>| {
            Array2::from_shape_vec(shape, data).map_err(|e| SemanticError::Inference(e.to_string()))
        };
        let input_ids = tensor(padded.ids.clone())?;
        let attention_mask = tensor(padded.mask.clone())?;
        let infer_err = |e: ort::Error| SemanticError::Inference(e.to_string());

        let outputs = if self.token_type_ids {
            let token_type_ids = Array2::<i64>::zeros(shape);
            self.session.run(
                ort::inputs! {
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                    "token_type_ids" => token_type_ids,
                }
                .map_err(infer_err)?,
            )
        } else {
            self.session.run(
                ort::inputs! {
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                }
                .map_err(infer_err)?,
            )
        }
        .map_err(infer_err)?;

        let output = outputs
            .get("sentence_embedding")
            .or_else(|| outputs.get("last_hidden_state"))
            .ok_or_else(|| SemanticError::Inference("model returned no embedding output".into()))?;
        let view: ndarray::ArrayViewD<f32> = output.try_extract_tensor().map_err(infer_err)?;
        let dims = view.shape().to_vec();
        let flat: Vec<f32> = view.iter().copied().collect();

        let mut vectors = pool_output(&flat, &dims, &padded)?;
        if self.normalize {
            vectors.iter_mut().for_each(|v| l2_normalize_in_place(v));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbedder {
    fn model_name(&self) -> &str {
        &self.model.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        self.embed_batch(&[text])
            .await?
            .pop()
            .ok_or_else(|| SemanticError::Inference("model returned no outputs".into()))
    }

    /// Inference is CPU-bound; it runs on the blocking pool so request
    /// workers keep serving.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let model = Arc::clone(&self.model);
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        tokio::task::spawn_blocking(move || model.run(&owned))
            .await
            .map_err(|e| SemanticError::Inference(format!("inference task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cfg(model: &str, tokenizer: &str) -> SemanticConfig {
        SemanticConfig {
            mode: "onnx".into(),
            model_path: PathBuf::from(model),
            tokenizer_path: PathBuf::from(tokenizer),
            ..Default::default()
        }
    }

    #[test]
    fn missing_model_file_is_reported() {
        let err = OnnxEmbedder::from_config(&cfg("/nonexistent/model.onnx", "/nonexistent/t.json"))
            .err()
            .expect("missing model must fail");
        assert_eq!(
            err,
            SemanticError::ModelNotFound("/nonexistent/model.onnx".into())
        );
    }

    #[tokio::test]
    #[ignore = "requires exported all-MiniLM-L6-v2 assets under models/"]
    async fn related_texts_are_closer() {
        let embedder = OnnxEmbedder::from_config(&SemanticConfig {
            mode: "onnx".into(),
            ..Default::default()
        })
        .unwrap();
        let v = embedder
            .embed_batch(&["salary payment", "monthly wages", "coffee beans"])
            .await
            .unwrap();
        assert_eq!(v[0].len(), 384);
        let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
        assert!(dot(&v[0], &v[1]) > dot(&v[0], &v[2]));
    }
}
