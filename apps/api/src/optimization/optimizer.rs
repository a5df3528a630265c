//! CV Optimization — rewrite, re-parse, re-score, keep only improvements.
//!
//! Flow: parse_cv → score → [rewrite → length guard → parse_cv → score]* → result.
//!
//! The loop stops as soon as the target score is reached, a rewrite fails to
//! improve the score, or the iteration budget is spent.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::cv_parser::parse_cv;
use crate::llm_client::prompts::{FRENCH_OUTPUT_INSTRUCTION, GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, LanguageModel};
use crate::matching::{MatchReport, MatchScorer};
use crate::models::cv::ParsedCv;
use crate::models::job::ParsedJob;
use crate::models::null_as_default;
use crate::optimization::prompts::{REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM};

pub const DEFAULT_MAX_ITERATIONS: u32 = 3;
pub const MAX_ITERATIONS_CAP: u32 = 5;
pub const DEFAULT_TARGET_SCORE: u32 = 80;

/// A rewrite shorter than this share of the current text is discarded.
const MIN_LENGTH_RATIO: f32 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationOptions {
    pub max_iterations: u32,
    pub target_score: u32,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            target_score: DEFAULT_TARGET_SCORE,
        }
    }
}

impl OptimizationOptions {
    /// Caps the iteration budget at `MAX_ITERATIONS_CAP` and the target at 100.
    pub fn clamped(self) -> Self {
        Self {
            max_iterations: self.max_iterations.min(MAX_ITERATIONS_CAP),
            target_score: self.target_score.min(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TargetReached,
    NoImprovement,
    MaxIterations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: u32,
    /// `None` when the rewrite was discarded before scoring.
    pub score: Option<u32>,
    pub accepted: bool,
    pub changes: Vec<String>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub original_score: u32,
    pub final_score: u32,
    pub optimized_cv: String,
    /// Report of the best version, i.e. the one returned in `optimized_cv`.
    pub report: MatchReport,
    pub iterations: Vec<IterationRecord>,
    pub stop_reason: StopReason,
}

/// Shape the rewriting prompt asks the LLM for.
#[derive(Debug, Deserialize)]
struct RewriteResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    cv_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    changes: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Optimization loop
// ────────────────────────────────────────────────────────────────────────────

/// Iteratively rewrites `cv_text` towards `job` and returns the best version found.
///
/// `job_text` is the posting `job` was parsed from; the scorer compares it to
/// each CV version.
pub async fn optimize_cv(
    llm: &dyn LanguageModel,
    scorer: &dyn MatchScorer,
    cv_text: &str,
    job: &ParsedJob,
    job_text: &str,
    options: OptimizationOptions,
) -> Result<OptimizationResult, AppError> {
    let options = options.clamped();

    let mut current_cv = parse_cv(cv_text, llm).await?;
    let mut best = scorer.score(&current_cv, cv_text, job, job_text).await?;
    let original_score = best.overall_score;
    info!(
        "Optimizing CV: initial score {}/100, target {}, budget {}",
        original_score, options.target_score, options.max_iterations
    );

    let mut current_text = cv_text.trim().to_string();
    let mut iterations = Vec::new();
    let mut stop_reason = StopReason::MaxIterations;

    for iteration in 1..=options.max_iterations {
        if best.overall_score >= options.target_score {
            stop_reason = StopReason::TargetReached;
            break;
        }

        let rewrite = request_rewrite(llm, &current_text, &current_cv, job, &best).await?;
        let candidate = rewrite.cv_text.trim();

        if let Some(reason) = reject_rewrite(candidate, &current_text) {
            warn!("Iteration {iteration}: rewrite discarded ({reason})");
            iterations.push(IterationRecord {
                iteration,
                score: None,
                accepted: false,
                changes: rewrite.changes,
                rejection_reason: Some(reason.to_string()),
            });
            continue;
        }

        let candidate_cv = parse_cv(candidate, llm).await?;
        let report = scorer.score(&candidate_cv, candidate, job, job_text).await?;
        let score = report.overall_score;

        if score > best.overall_score {
            info!(
                "Iteration {iteration}: score {} → {score}, rewrite kept",
                best.overall_score
            );
            iterations.push(IterationRecord {
                iteration,
                score: Some(score),
                accepted: true,
                changes: rewrite.changes,
                rejection_reason: None,
            });
            current_text = candidate.to_string();
            current_cv = candidate_cv;
            best = report;
        } else {
            info!(
                "Iteration {iteration}: score {score} does not beat {}, stopping",
                best.overall_score
            );
            iterations.push(IterationRecord {
                iteration,
                score: Some(score),
                accepted: false,
                changes: rewrite.changes,
                rejection_reason: Some("no_improvement".to_string()),
            });
            stop_reason = StopReason::NoImprovement;
            break;
        }
    }

    // The last accepted rewrite may reach the target on the final iteration
    if stop_reason == StopReason::MaxIterations && best.overall_score >= options.target_score {
        stop_reason = StopReason::TargetReached;
    }

    Ok(OptimizationResult {
        original_score,
        final_score: best.overall_score,
        optimized_cv: current_text,
        report: best,
        iterations,
        stop_reason,
    })
}

/// Returns why a rewrite is unusable, if it is.
fn reject_rewrite(candidate: &str, current: &str) -> Option<&'static str> {
    if candidate.is_empty() {
        return Some("empty_rewrite");
    }
    let current_len = current.chars().count() as f32;
    if (candidate.chars().count() as f32) < current_len * MIN_LENGTH_RATIO {
        return Some("rewrite_too_short");
    }
    None
}

async fn request_rewrite(
    llm: &dyn LanguageModel,
    cv_text: &str,
    cv: &ParsedCv,
    job: &ParsedJob,
    report: &MatchReport,
) -> Result<RewriteResponse, AppError> {
    let missing_keywords = if report.missing_keywords.is_empty() {
        "(aucun)".to_string()
    } else {
        report.missing_keywords.join(", ")
    };

    let skill_gaps = if report.gaps.is_empty() {
        "(aucun)".to_string()
    } else {
        report
            .gaps
            .iter()
            .map(|gap| match gap.required_level {
                Some(level) => format!("- {} (niveau attendu : {})", gap.skill, level.as_str()),
                None => format!("- {}", gap.skill),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let declared_skills = cv.skill_names();
    let declared_skills = if declared_skills.is_empty() {
        "(aucune)".to_string()
    } else {
        declared_skills.join(", ")
    };

    let prompt = REWRITE_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{french_instruction}", FRENCH_OUTPUT_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{job_summary}", &job.plain_text())
        .replace("{missing_keywords}", &missing_keywords)
        .replace("{skill_gaps}", &skill_gaps)
        .replace("{declared_skills}", &declared_skills)
        .replace("{cv_text}", cv_text);

    call_json(llm, &prompt, REWRITE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("CV rewriting failed: {e}")))
}
