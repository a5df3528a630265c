//! Axum route handlers for the Optimization API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::{AppError, AppJson};
use crate::extraction::job_parser::parse_job;
use crate::optimization::{optimize_cv, OptimizationOptions, OptimizationResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub cv_text: String,
    pub job_text: String,
    /// Falls back to OPTIMIZATION_MAX_ITERATIONS.
    pub max_iterations: Option<u32>,
    /// Falls back to OPTIMIZATION_TARGET_SCORE.
    pub target_score: Option<u32>,
}

/// POST /api/v1/matching/optimize
///
/// Rewrites the CV towards the posting. Long-running: one parse and one score
/// per iteration, plus the rewrite call.
pub async fn handle_optimize(
    State(state): State<AppState>,
    AppJson(request): AppJson<OptimizeRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    if request.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text cannot be empty".to_string()));
    }

    let job = parse_job(&request.job_text, state.llm.as_ref()).await?;
    let options = OptimizationOptions {
        max_iterations: request
            .max_iterations
            .unwrap_or(state.config.optimization_max_iterations),
        target_score: request
            .target_score
            .unwrap_or(state.config.optimization_target_score),
    };

    let result = optimize_cv(
        state.llm.as_ref(),
        state.scorer.as_ref(),
        &request.cv_text,
        &job,
        &request.job_text,
        options,
    )
    .await?;

    Ok(Json(result))
}
