//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::extraction::cv_parser::parse_cv;
use crate::extraction::job_parser::parse_job;
use crate::matching::MatchReport;
use crate::models::cv::ParsedCv;
use crate::models::job::ParsedJob;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub cv_text: String,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub report: MatchReport,
    pub cv: ParsedCv,
    pub job: ParsedJob,
}

/// POST /api/v1/matching/score
///
/// Parses the CV and the posting in parallel, then scores the pair.
pub async fn handle_score(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let llm = state.llm.as_ref();
    let (cv, job) = tokio::try_join!(
        parse_cv(&request.cv_text, llm),
        parse_job(&request.job_text, llm)
    )?;

    let report = state
        .scorer
        .score(&cv, &request.cv_text, &job, &request.job_text)
        .await?;
    info!(
        "Match score {}/100 for '{}' ({})",
        report.overall_score, job.title, report.scorer_backend
    );

    Ok(Json(ScoreResponse { report, cv, job }))
}
