//! Candidate ranking — parse and score every CV of a batch against a dossier.

use std::cmp::Ordering;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::dossier::models::{
    CandidateFailure, CandidateInput, CandidateMatch, Dossier, RankingResult,
};
use crate::errors::AppError;
use crate::extraction::cv_parser::parse_cv;
use crate::llm_client::LanguageModel;
use crate::matching::{MatchReport, MatchScorer};
use crate::models::job::ParsedJob;

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const MAX_CANDIDATES: usize = 50;

/// Scores every candidate against the dossier, at most `concurrency` at a time.
/// A candidate whose CV cannot be parsed or scored lands in `failures`.
pub async fn rank_candidates(
    llm: &dyn LanguageModel,
    scorer: &dyn MatchScorer,
    dossier: &Dossier,
    candidates: Vec<CandidateInput>,
    concurrency: usize,
) -> Result<RankingResult, AppError> {
    if dossier.title.trim().is_empty() {
        return Err(AppError::Validation("dossier title cannot be empty".to_string()));
    }
    if candidates.is_empty() {
        return Err(AppError::Validation("candidates cannot be empty".to_string()));
    }
    if candidates.len() > MAX_CANDIDATES {
        return Err(AppError::Validation(format!(
            "too many candidates: {} (max {MAX_CANDIDATES})",
            candidates.len()
        )));
    }

    let job = dossier.to_job();
    let job_text = job.plain_text();
    let concurrency = concurrency.max(1);
    info!(
        "Ranking {} candidates for dossier {} ({} at a time)",
        candidates.len(),
        dossier.id,
        concurrency
    );

    let outcomes: Vec<(String, Result<MatchReport, AppError>)> = stream::iter(candidates)
        .map(|candidate| {
            let job = &job;
            let job_text = job_text.as_str();
            async move {
                let outcome = score_candidate(llm, scorer, &candidate, job, job_text).await;
                (candidate.name, outcome)
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut matches = Vec::new();
    let mut failures = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(report) => matches.push(CandidateMatch {
                shortlisted: report.overall_score >= dossier.shortlist_threshold,
                overall_score: report.overall_score,
                name,
                report,
            }),
            Err(e) => {
                warn!("Candidate '{name}' could not be scored: {e}");
                let (_, code, message) = e.parts();
                failures.push(CandidateFailure {
                    name,
                    code: code.to_string(),
                    error: message,
                });
            }
        }
    }

    sort_matches(&mut matches);
    failures.sort_by(|a, b| a.name.cmp(&b.name));
    let shortlisted_count = matches.iter().filter(|m| m.shortlisted).count();

    info!(
        "Dossier {}: {} scored, {} shortlisted, {} failed",
        dossier.id,
        matches.len(),
        shortlisted_count,
        failures.len()
    );

    Ok(RankingResult {
        dossier_id: dossier.id,
        matches,
        failures,
        shortlisted_count,
    })
}

async fn score_candidate(
    llm: &dyn LanguageModel,
    scorer: &dyn MatchScorer,
    candidate: &CandidateInput,
    job: &ParsedJob,
    job_text: &str,
) -> Result<MatchReport, AppError> {
    let cv = parse_cv(&candidate.cv_text, llm).await?;
    scorer.score(&cv, &candidate.cv_text, job, job_text).await
}

/// Score descending, then name ascending.
fn sort_matches(matches: &mut [CandidateMatch]) {
    matches.sort_by(|a, b| match b.overall_score.cmp(&a.overall_score) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
}
