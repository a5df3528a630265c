//! Axum route handler for the ATS audit.

use axum::Json;
use serde::Deserialize;

use crate::ats::{check_ats_compatibility, AtsReport};
use crate::errors::{AppError, AppJson};

#[derive(Debug, Deserialize)]
pub struct AtsCheckRequest {
    pub cv_text: String,
}

/// POST /api/v1/ats/check
pub async fn handle_ats_check(
    AppJson(request): AppJson<AtsCheckRequest>,
) -> Result<Json<AtsReport>, AppError> {
    let report = check_ats_compatibility(&request.cv_text)?;
    Ok(Json(report))
}
