//! Axum route handlers for the Resume builder API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::extraction::cv_parser::parse_cv;
use crate::extraction::job_parser::parse_job;
use crate::matching::MatchReport;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImportResumeRequest {
    pub cv_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderResumeRequest {
    pub resume: ResumeDocument,
    pub section_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreResumeRequest {
    pub resume: ResumeDocument,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreResumeResponse {
    pub report: MatchReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/import
///
/// Parses a CV and lays it out as a builder document.
pub async fn handle_import_resume(
    State(state): State<AppState>,
    AppJson(request): AppJson<ImportResumeRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let cv = parse_cv(&request.cv_text, state.llm.as_ref()).await?;
    Ok(Json(ResumeDocument::from_parsed_cv(&cv)))
}

/// POST /api/v1/resumes/reorder
pub async fn handle_reorder_resume(
    AppJson(request): AppJson<ReorderResumeRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let mut resume = request.resume;
    resume
        .reorder_sections(&request.section_order)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/score
///
/// Scores the visible content of a builder document against a posting.
pub async fn handle_score_resume(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScoreResumeRequest>,
) -> Result<Json<ScoreResumeResponse>, AppError> {
    let resume_text = request.resume.plain_text();
    if resume_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "resume has no visible content to score".to_string(),
        ));
    }

    let llm = state.llm.as_ref();
    let (cv, job) = tokio::try_join!(
        parse_cv(&resume_text, llm),
        parse_job(&request.job_text, llm)
    )?;
    let report = state
        .scorer
        .score(&cv, &resume_text, &job, &request.job_text)
        .await?;

    Ok(Json(ScoreResumeResponse { report }))
}
