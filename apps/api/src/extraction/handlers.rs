//! Axum route handlers for the Extraction API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::extraction::cv_parser::parse_cv;
use crate::extraction::job_parser::parse_job;
use crate::extraction::linkedin_parser::parse_linkedin;
use crate::models::cv::ParsedCv;
use crate::models::job::ParsedJob;
use crate::models::linkedin::LinkedInProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseCvRequest {
    pub cv_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseCvResponse {
    pub cv: ParsedCv,
}

#[derive(Debug, Deserialize)]
pub struct ParseJobRequest {
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseJobResponse {
    pub job: ParsedJob,
}

#[derive(Debug, Deserialize)]
pub struct ParseLinkedInRequest {
    pub profile_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseLinkedInResponse {
    pub profile: LinkedInProfile,
    /// The same profile in CV form, ready for matching.
    pub cv: ParsedCv,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/parse
pub async fn handle_parse_cv(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseCvRequest>,
) -> Result<Json<ParseCvResponse>, AppError> {
    let cv = parse_cv(&request.cv_text, state.llm.as_ref()).await?;
    Ok(Json(ParseCvResponse { cv }))
}

/// POST /api/v1/jobs/parse
pub async fn handle_parse_job(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseJobRequest>,
) -> Result<Json<ParseJobResponse>, AppError> {
    let job = parse_job(&request.job_text, state.llm.as_ref()).await?;
    Ok(Json(ParseJobResponse { job }))
}

/// POST /api/v1/linkedin/parse
///
/// Returns the profile as extracted plus its CV conversion.
pub async fn handle_parse_linkedin(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseLinkedInRequest>,
) -> Result<Json<ParseLinkedInResponse>, AppError> {
    let profile = parse_linkedin(&request.profile_text, state.llm.as_ref()).await?;
    let cv = profile.clone().into_cv();
    Ok(Json(ParseLinkedInResponse { profile, cv }))
}
