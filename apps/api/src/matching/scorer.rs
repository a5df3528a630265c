//! Match Scoring — pluggable, trait-based scorer combining five sub-scores
//! with fixed weights into a 0–100 matching score.
//!
//! Backends:
//! - `SemanticMatchScorer`: semantic factor from embedding cosine similarity.
//! - `LexicalMatchScorer`: semantic factor from term-frequency cosine. No LLM call.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, chosen at startup via config.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::matching::embeddings::{cosine_similarity, EmbeddingCache};
use crate::matching::factors::{
    experience_relevance, keyword_coverage, sector_alignment, skills_level, SkillGap,
};
use crate::models::cv::ParsedCv;
use crate::models::job::ParsedJob;
use crate::text::term_frequency_cosine;

pub const BACKEND_SEMANTIC: &str = "semantic";
pub const BACKEND_LEXICAL: &str = "lexical";

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// The five sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub semantic: f32,
    pub keywords: f32,
    pub experience: f32,
    pub skills: f32,
    pub sector: f32,
}

/// Fixed weights of the linear combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub semantic: f32,
    pub keywords: f32,
    pub experience: f32,
    pub skills: f32,
    pub sector: f32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            semantic: 0.35,
            keywords: 0.25,
            experience: 0.20,
            skills: 0.10,
            sector: 0.10,
        }
    }
}

impl MatchWeights {
    /// round(100 × Σ wᵢ·sᵢ / Σ wᵢ), clamped to [0, 100].
    pub fn overall_score(&self, b: &ScoreBreakdown) -> u32 {
        let total = self.semantic + self.keywords + self.experience + self.skills + self.sector;
        if total <= 0.0 {
            return 0;
        }
        let weighted = self.semantic * b.semantic
            + self.keywords * b.keywords
            + self.experience * b.experience
            + self.skills * b.skills
            + self.sector * b.sector;
        ((weighted / total) * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub overall_score: u32, // 0 – 100
    pub breakdown: ScoreBreakdown,
    pub matched_keywords: Vec<String>,
    /// Heaviest first.
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<SkillGap>,
    pub recommendation: String,
    pub scorer_backend: String, // "semantic" | "lexical"
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers,
/// the optimizer or dossier ranking.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    /// `cv_text` and `job_text` are the texts the structured data came from.
    async fn score(
        &self,
        cv: &ParsedCv,
        cv_text: &str,
        job: &ParsedJob,
        job_text: &str,
    ) -> Result<MatchReport, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

/// Embedding-based scorer. Falls back to the lexical similarity when the
/// embedding call fails, so one provider hiccup does not fail a whole ranking.
pub struct SemanticMatchScorer {
    llm: Arc<dyn LanguageModel>,
    cache: EmbeddingCache,
    weights: MatchWeights,
}

impl SemanticMatchScorer {
    pub fn new(llm: Arc<dyn LanguageModel>, cache_capacity: usize, weights: MatchWeights) -> Self {
        Self {
            llm,
            cache: EmbeddingCache::new(cache_capacity),
            weights,
        }
    }
}

#[async_trait]
impl MatchScorer for SemanticMatchScorer {
    async fn score(
        &self,
        cv: &ParsedCv,
        cv_text: &str,
        job: &ParsedJob,
        job_text: &str,
    ) -> Result<MatchReport, AppError> {
        let cv_text = cv_source_text(cv, cv_text);
        let texts = [cv_text.to_string(), job_text.to_string()];
        let (semantic, backend) = match self.cache.embed(self.llm.as_ref(), &texts).await {
            Ok(vectors) => {
                debug!("Embedding cache holds {} vectors", self.cache.len().await);
                (cosine_similarity(&vectors[0], &vectors[1]), BACKEND_SEMANTIC)
            }
            Err(e) => {
                warn!("Embedding failed, falling back to lexical similarity: {e}");
                (term_frequency_cosine(&cv_text, job_text), BACKEND_LEXICAL)
            }
        };

        Ok(build_report(
            semantic,
            cv,
            &cv_text,
            job,
            &self.weights,
            backend,
            Utc::now().date_naive(),
        ))
    }
}

/// Pure-Rust scorer. Fast, deterministic, no LLM call.
pub struct LexicalMatchScorer {
    pub weights: MatchWeights,
}

#[async_trait]
impl MatchScorer for LexicalMatchScorer {
    async fn score(
        &self,
        cv: &ParsedCv,
        cv_text: &str,
        job: &ParsedJob,
        job_text: &str,
    ) -> Result<MatchReport, AppError> {
        let cv_text = cv_source_text(cv, cv_text);
        Ok(build_report(
            term_frequency_cosine(&cv_text, job_text),
            cv,
            &cv_text,
            job,
            &self.weights,
            BACKEND_LEXICAL,
            Utc::now().date_naive(),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report assembly
// ────────────────────────────────────────────────────────────────────────────

/// CVs built from structured data only (LinkedIn imports) have no source
/// text; their flattening stands in for it.
fn cv_source_text<'a>(cv: &ParsedCv, cv_text: &'a str) -> Cow<'a, str> {
    if cv_text.trim().is_empty() {
        Cow::Owned(cv.plain_text())
    } else {
        Cow::Borrowed(cv_text)
    }
}

/// Computes the four local sub-scores and assembles the report around the
/// given semantic similarity.
pub fn build_report(
    semantic: f32,
    cv: &ParsedCv,
    cv_text: &str,
    job: &ParsedJob,
    weights: &MatchWeights,
    backend: &str,
    today: NaiveDate,
) -> MatchReport {
    let keywords = keyword_coverage(cv_text, job);
    let skills = skills_level(cv, job);

    let breakdown = ScoreBreakdown {
        semantic: semantic.clamp(0.0, 1.0),
        keywords: keywords.score,
        experience: experience_relevance(cv, job, today),
        skills: skills.score,
        sector: sector_alignment(cv, job),
    };
    let overall_score = weights.overall_score(&breakdown);

    let missing_keywords: Vec<String> = keywords.missing.into_iter().map(|k| k.keyword).collect();
    let recommendation = build_recommendation(overall_score, &missing_keywords);

    MatchReport {
        overall_score,
        breakdown,
        matched_keywords: keywords.matched,
        missing_keywords,
        strengths: skills.strengths,
        gaps: skills.gaps,
        recommendation,
        scorer_backend: backend.to_string(),
    }
}

/// French recommendation from the score and the heaviest missing keywords.
fn build_recommendation(score: u32, missing_keywords: &[String]) -> String {
    let top: Vec<&str> = missing_keywords.iter().take(3).map(String::as_str).collect();

    if score >= 75 {
        format!(
            "Excellente adéquation ({score}/100). Le profil couvre l'essentiel des exigences du poste."
        )
    } else if score >= 55 {
        if top.is_empty() {
            format!("Adéquation correcte ({score}/100). Mettez davantage en avant les réalisations liées au poste.")
        } else {
            format!(
                "Adéquation correcte ({score}/100). Points à renforcer : {}.",
                top.join(", ")
            )
        }
    } else if top.is_empty() {
        format!("Adéquation faible ({score}/100). Le parcours s'éloigne du poste visé.")
    } else {
        format!(
            "Adéquation faible ({score}/100). Écarts importants : {}. Adaptez le CV avant de postuler.",
            top.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FakeLanguageModel;
    use crate::models::cv::{CvSkill, Experience};
    use crate::models::job::{JobKeyword, JobSkill};
    use crate::models::skill::SkillLevel;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn rust_job() -> ParsedJob {
        ParsedJob {
            title: "Développeur Backend Rust".to_string(),
            sector: Some("Fintech".to_string()),
            min_experience_years: Some(3.0),
            required_skills: vec![JobSkill {
                name: "Rust".to_string(),
                level: Some(SkillLevel::Avance),
                required: true,
            }],
            keywords: vec![
                JobKeyword {
                    keyword: "Rust".to_string(),
                    weight: 1.0,
                },
                JobKeyword {
                    keyword: "Kafka".to_string(),
                    weight: 0.6,
                },
            ],
            ..Default::default()
        }
    }

    fn rust_cv() -> ParsedCv {
        ParsedCv {
            experiences: vec![Experience {
                title: "Développeur Backend Rust".to_string(),
                start_date: Some("2019-01".to_string()),
                end_date: None,
                sector: Some("Fintech".to_string()),
                ..Default::default()
            }],
            skills: vec![CvSkill {
                name: "Rust".to_string(),
                level: Some(SkillLevel::Expert),
                category: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = MatchWeights::default();
        let sum = w.semantic + w.keywords + w.experience + w.skills + w.sector;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_overall_score_bounds() {
        let w = MatchWeights::default();
        let all = |v| ScoreBreakdown {
            semantic: v,
            keywords: v,
            experience: v,
            skills: v,
            sector: v,
        };
        assert_eq!(w.overall_score(&all(1.0)), 100);
        assert_eq!(w.overall_score(&all(0.0)), 0);
        assert_eq!(w.overall_score(&all(0.5)), 50);
    }

    #[test]
    fn test_overall_score_uses_weights() {
        let w = MatchWeights::default();
        let b = ScoreBreakdown {
            semantic: 1.0,
            keywords: 0.0,
            experience: 0.0,
            skills: 0.0,
            sector: 0.0,
        };
        assert_eq!(w.overall_score(&b), 35);
    }

    #[test]
    fn test_zero_weights_score_zero() {
        let w = MatchWeights {
            semantic: 0.0,
            keywords: 0.0,
            experience: 0.0,
            skills: 0.0,
            sector: 0.0,
        };
        let b = ScoreBreakdown {
            semantic: 1.0,
            keywords: 1.0,
            experience: 1.0,
            skills: 1.0,
            sector: 1.0,
        };
        assert_eq!(w.overall_score(&b), 0);
    }

    #[test]
    fn test_build_report_strong_candidate() {
        let report = build_report(
            0.8,
            &rust_cv(),
            "Développeur Backend Rust chez Qonto, Kafka et PostgreSQL",
            &rust_job(),
            &MatchWeights::default(),
            BACKEND_SEMANTIC,
            today(),
        );
        assert_eq!(report.breakdown.keywords, 1.0);
        assert_eq!(report.breakdown.skills, 1.0);
        assert_eq!(report.breakdown.sector, 1.0);
        assert_eq!(report.breakdown.experience, 1.0);
        // 0.35 * 0.8 + 0.65
        assert_eq!(report.overall_score, 93);
        assert!(report.recommendation.starts_with("Excellente adéquation"));
        assert_eq!(report.strengths, vec!["Rust"]);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_build_report_lists_missing_keywords() {
        let report = build_report(
            0.2,
            &ParsedCv::default(),
            "Assistante administrative",
            &rust_job(),
            &MatchWeights::default(),
            BACKEND_LEXICAL,
            today(),
        );
        assert_eq!(report.missing_keywords, vec!["Rust", "Kafka"]);
        assert!(report.overall_score < 55);
        assert!(report.recommendation.contains("Rust, Kafka"));
        assert_eq!(report.gaps[0].skill, "Rust");
        assert_eq!(report.scorer_backend, "lexical");
    }

    #[test]
    fn test_recommendation_tiers() {
        assert!(build_recommendation(80, &[]).starts_with("Excellente"));
        let rec = build_recommendation(60, &["SAP".to_string()]);
        assert!(rec.contains("60/100") && rec.contains("SAP"));
        assert!(build_recommendation(30, &[]).starts_with("Adéquation faible"));
    }

    #[tokio::test]
    async fn test_semantic_scorer_uses_embeddings() {
        let llm: Arc<dyn LanguageModel> = Arc::new(FakeLanguageModel::new());
        let scorer = SemanticMatchScorer::new(llm, 16, MatchWeights::default());
        let text = "Développeur Backend Rust Kafka";
        let report = scorer.score(&rust_cv(), text, &rust_job(), text).await.unwrap();
        assert_eq!(report.scorer_backend, BACKEND_SEMANTIC);
        assert!((report.breakdown.semantic - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_semantic_scorer_falls_back_when_embeddings_fail() {
        let llm: Arc<dyn LanguageModel> = Arc::new(FakeLanguageModel::new().failing_embeddings());
        let scorer = SemanticMatchScorer::new(llm, 16, MatchWeights::default());
        let report = scorer
            .score(&rust_cv(), "Rust backend", &rust_job(), "Rust backend")
            .await
            .unwrap();
        assert_eq!(report.scorer_backend, BACKEND_LEXICAL);
        assert!((report.breakdown.semantic - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_structured_only_cv_scores_its_flattening() {
        let scorer = LexicalMatchScorer {
            weights: MatchWeights::default(),
        };
        let report = scorer
            .score(&rust_cv(), "", &rust_job(), "Développeur Backend Rust")
            .await
            .unwrap();
        assert!(report.matched_keywords.contains(&"Rust".to_string()));
        assert!(report.breakdown.semantic > 0.0);
    }

    #[tokio::test]
    async fn test_lexical_scorer_is_deterministic() {
        let scorer = LexicalMatchScorer {
            weights: MatchWeights::default(),
        };
        let a = scorer
            .score(&rust_cv(), "Rust Kafka", &rust_job(), "Rust Kafka Fintech")
            .await
            .unwrap();
        let b = scorer
            .score(&rust_cv(), "Rust Kafka", &rust_job(), "Rust Kafka Fintech")
            .await
            .unwrap();
        assert_eq!(a.overall_score, b.overall_score);
        assert_eq!(a.breakdown, b.breakdown);
    }
}
