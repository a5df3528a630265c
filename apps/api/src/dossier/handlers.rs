//! Axum route handlers for the Dossier API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::dossier::models::{CandidateInput, Dossier, RankingResult};
use crate::dossier::ranking::{rank_candidates, DEFAULT_CONCURRENCY};
use crate::errors::{AppError, AppJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchDossierRequest {
    pub dossier: Dossier,
    pub candidates: Vec<CandidateInput>,
    pub concurrency: Option<usize>,
}

/// POST /api/v1/dossiers/match
///
/// Ranks the candidates against the dossier and flags the shortlist.
pub async fn handle_match_dossier(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchDossierRequest>,
) -> Result<Json<RankingResult>, AppError> {
    let result = rank_candidates(
        state.llm.as_ref(),
        state.scorer.as_ref(),
        &request.dossier,
        request.candidates,
        request.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
    )
    .await?;
    Ok(Json(result))
}
