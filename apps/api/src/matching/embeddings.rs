//! Embedding similarity and a small in-process embedding cache.

use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;
use tracing::debug;

use crate::llm_client::{LanguageModel, LlmError};

/// Cosine similarity clamped to [0, 1].
/// Vectors of different length, empty vectors and zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if cosine.is_finite() {
        cosine.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

struct CacheInner {
    vectors: HashMap<String, Vec<f32>>,
    insertion_order: VecDeque<String>,
}

/// Bounded text → embedding cache with FIFO eviction.
/// A capacity of 0 disables caching.
pub struct EmbeddingCache {
    capacity: usize,
    inner: RwLock<CacheInner>,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(CacheInner {
                vectors: HashMap::new(),
                insertion_order: VecDeque::new(),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.vectors.len()
    }

    /// Returns one embedding per text, calling the model once for all cache misses.
    pub async fn embed(
        &self,
        llm: &dyn LanguageModel,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, LlmError> {
        let mut results: Vec<Option<Vec<f32>>> = {
            let inner = self.inner.read().await;
            texts.iter().map(|t| inner.vectors.get(t).cloned()).collect()
        };

        let mut missing: Vec<String> = Vec::new();
        for (text, slot) in texts.iter().zip(&results) {
            if slot.is_none() && !missing.contains(text) {
                missing.push(text.clone());
            }
        }

        if !missing.is_empty() {
            debug!(
                "Embedding cache: {} hit(s), {} miss(es)",
                texts.len() - missing.len(),
                missing.len()
            );
            let fresh = llm.embed(&missing).await?;
            if fresh.len() != missing.len() {
                return Err(LlmError::Api {
                    status: 200,
                    message: format!("expected {} embeddings, got {}", missing.len(), fresh.len()),
                });
            }
            let fresh: HashMap<String, Vec<f32>> = missing.into_iter().zip(fresh).collect();

            for (text, slot) in texts.iter().zip(results.iter_mut()) {
                if slot.is_none() {
                    *slot = fresh.get(text).cloned();
                }
            }
            self.insert_all(fresh).await;
        }

        Ok(results.into_iter().map(Option::unwrap_or_default).collect())
    }

    async fn insert_all(&self, fresh: HashMap<String, Vec<f32>>) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.write().await;
        for (text, vector) in fresh {
            if inner.vectors.contains_key(&text) {
                continue;
            }
            while inner.vectors.len() >= self.capacity {
                match inner.insertion_order.pop_front() {
                    Some(oldest) => {
                        inner.vectors.remove(&oldest);
                    }
                    None => break,
                }
            }
            inner.insertion_order.push_back(text.clone());
            inner.vectors.insert(text, vector);
        }
    }
}
