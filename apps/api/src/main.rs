mod ats;
mod config;
mod dossier;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod optimization;
mod resumes;
mod routes;
mod state;
mod text;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{LanguageModel, OpenAiClient};
use crate::matching::{LexicalMatchScorer, MatchScorer, MatchWeights, SemanticMatchScorer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let client = OpenAiClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.chat_model.clone(),
        config.embedding_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", client.chat_model());
    let llm: Arc<dyn LanguageModel> = Arc::new(client);

    // Initialize match scorer (semantic by default, lexical via ENABLE_SEMANTIC_SCORING=false)
    let scorer: Arc<dyn MatchScorer> = if config.enable_semantic_scoring {
        info!(
            "Semantic match scoring enabled (embedding cache: {} entries)",
            config.embedding_cache_capacity
        );
        Arc::new(SemanticMatchScorer::new(
            llm.clone(),
            config.embedding_cache_capacity,
            MatchWeights::default(),
        ))
    } else {
        info!("Lexical match scoring enabled");
        Arc::new(LexicalMatchScorer {
            weights: MatchWeights::default(),
        })
    };

    // Build app state
    let state = AppState {
        llm,
        scorer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the builder front-end domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
