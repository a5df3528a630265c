use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::matching::MatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every LLM call goes through this handle. Tests swap in a scripted model.
    pub llm: Arc<dyn LanguageModel>,
    /// Pluggable match scorer. Semantic by default; lexical when
    /// ENABLE_SEMANTIC_SCORING=false.
    pub scorer: Arc<dyn MatchScorer>,
    pub config: Config,
}
