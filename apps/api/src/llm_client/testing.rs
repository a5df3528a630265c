//! Scripted `LanguageModel` for unit tests. No network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LanguageModel, LlmError};

const EMBEDDING_DIMS: usize = 64;

/// Replies to `complete` by system prompt. Each system prompt has a queue of
/// replies; the last reply is repeated once the queue is down to one.
/// Embeddings are a deterministic hashed bag of lower-cased words, so lexically
/// close texts get close vectors.
#[derive(Default)]
pub struct FakeLanguageModel {
    replies: Mutex<HashMap<String, VecDeque<String>>>,
    fail_embeddings: bool,
    completions: AtomicUsize,
    embed_calls: AtomicUsize,
}

impl FakeLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, system: &str, reply: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(system.to_string())
            .or_default()
            .push_back(reply.to_string());
        self
    }

    pub fn failing_embeddings(mut self) -> Self {
        self.fail_embeddings = true;
        self
    }

    pub fn completion_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub fn embed_call_count(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn complete(&self, _prompt: &str, system: &str) -> Result<String, LlmError> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(system).ok_or(LlmError::Api {
            status: 400,
            message: "no scripted reply for this system prompt".to_string(),
        })?;
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or_default())
        } else {
            queue.front().cloned().ok_or(LlmError::EmptyContent)
        }
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_embeddings {
            return Err(LlmError::Api {
                status: 503,
                message: "embeddings unavailable".to_string(),
            });
        }
        Ok(inputs.iter().map(|text| hashed_embedding(text)).collect())
    }
}

fn hashed_embedding(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0_f32; EMBEDDING_DIMS];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
    {
        let bucket = word
            .to_lowercase()
            .bytes()
            .fold(7usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
            % EMBEDDING_DIMS;
        vector[bucket] += 1.0;
    }
    vector
}
