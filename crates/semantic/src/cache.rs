use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use lru::LruCache;

use crate::{EmbeddingProvider, SemanticError};

/// LRU cache of vectors keyed by input text, wrapping any provider.
///
/// Providers are deterministic, so a cached vector is exactly what the
/// wrapped provider would return. Failed calls are never cached. The lock is
/// not held across the inner provider call.
pub struct CachingEmbedder<P> {
    inner: P,
    cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl<P: EmbeddingProvider> CachingEmbedder<P> {
    pub fn new(inner: P, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached vectors.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Vec<f32>>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachingEmbedder<P> {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        let cached = self.lock().get(text).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }
        let vector = self.inner.embed(text).await?;
        self.lock().put(text.to_string(), vector.clone());
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let mut slots: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut missing: Vec<&str> = Vec::new();
        let mut missing_slots: Vec<usize> = Vec::new();
        {
            let mut cache = self.lock();
            for (slot, text) in texts.iter().enumerate() {
                match cache.get(*text) {
                    Some(hit) => slots.push(Some(hit.clone())),
                    None => {
                        slots.push(None);
                        missing.push(*text);
                        missing_slots.push(slot);
                    }
                }
            }
        }

        if !missing.is_empty() {
            let fresh = self.inner.embed_batch(&missing).await?;
            if fresh.len() != missing.len() {
                return Err(SemanticError::Inference(format!(
                    "provider returned {} embeddings for {} inputs",
                    fresh.len(),
                    missing.len()
                )));
            }
            let mut cache = self.lock();
            for (slot, vector) in missing_slots.into_iter().zip(fresh) {
                cache.put(texts[slot].to_string(), vector.clone());
                slots[slot] = Some(vector);
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    fn warm_up(&self) -> Result<(), SemanticError> {
        self.inner.warm_up()
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }
}
