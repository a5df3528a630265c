//! The four local sub-scores: keyword coverage, experience relevance,
//! skills level, sector alignment. Each returns a value in [0, 1].
//!
//! When the job posting gives nothing to compare against, a factor returns
//! `NEUTRAL` instead of rewarding or penalising the candidate.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::cv::{parse_month, ParsedCv};
use crate::models::job::{JobKeyword, ParsedJob};
use crate::models::skill::SkillLevel;
use crate::text::{content_token_set, contains_phrase, normalize, tokens};

pub const NEUTRAL: f32 = 0.5;

const YEARS_SHARE: f32 = 0.6;
const ROLE_SHARE: f32 = 0.4;
const TITLE_SHARE: f32 = 0.6;
const OPTIONAL_SKILL_WEIGHT: f32 = 0.5;
const SECTOR_PARTIAL: f32 = 0.6;
const SECTOR_UNDECLARED: f32 = 0.3;

// ────────────────────────────────────────────────────────────────────────────
// Keywords
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KeywordCoverage {
    pub score: f32,
    pub matched: Vec<String>,
    /// Sorted by weight, heaviest first.
    pub missing: Vec<JobKeyword>,
}

/// Σ(weight of keywords found in the CV) / Σ(all weights).
/// Matching is whole-token and accent/case-insensitive.
pub fn keyword_coverage(cv_text: &str, job: &ParsedJob) -> KeywordCoverage {
    let haystack = tokens(cv_text);
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut total = 0.0_f32;
    let mut found = 0.0_f32;

    for kw in job.effective_keywords() {
        let phrase = tokens(&kw.keyword);
        if phrase.is_empty() {
            continue;
        }
        total += kw.weight;
        if contains_phrase(&haystack, &phrase) {
            found += kw.weight;
            matched.push(kw.keyword);
        } else {
            missing.push(kw);
        }
    }

    missing.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let score = if total > 0.0 {
        (found / total).clamp(0.0, 1.0)
    } else {
        NEUTRAL
    };

    KeywordCoverage {
        score,
        matched,
        missing,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// 0.6 × years factor + 0.4 × role relevance.
pub fn experience_relevance(cv: &ParsedCv, job: &ParsedJob, today: NaiveDate) -> f32 {
    let years = years_factor(cv, job, today);
    let role = role_relevance(cv, job);
    (YEARS_SHARE * years + ROLE_SHARE * role).clamp(0.0, 1.0)
}

fn years_factor(cv: &ParsedCv, job: &ParsedJob, today: NaiveDate) -> f32 {
    if cv.experiences.is_empty() {
        return match job.min_experience_years {
            Some(min) if min > 0.0 => 0.0,
            _ => NEUTRAL,
        };
    }

    let has_dates = cv
        .experiences
        .iter()
        .any(|e| e.start_date.as_deref().and_then(parse_month).is_some());

    match job.min_experience_years {
        Some(min) if min > 0.0 => {
            if !has_dates {
                return NEUTRAL;
            }
            (cv.total_experience_years(today) / min).min(1.0)
        }
        _ => 1.0,
    }
}

/// Best match between one experience and the job title / responsibilities.
fn role_relevance(cv: &ParsedCv, job: &ParsedJob) -> f32 {
    let job_title = content_token_set(&job.title);
    if job_title.is_empty() {
        return NEUTRAL;
    }
    let job_body = content_token_set(&job.responsibilities.join(" "));

    cv.experiences
        .iter()
        .map(|exp| {
            let exp_title = content_token_set(&exp.title);
            let mut exp_all = exp_title.clone();
            exp_all.extend(content_token_set(exp.description.as_deref().unwrap_or("")));
            exp_all.extend(content_token_set(&exp.achievements.join(" ")));
            exp_all.extend(content_token_set(&exp.skills.join(" ")));

            let title_overlap = overlap_ratio(&job_title, &exp_title);
            let body_overlap = if job_body.is_empty() {
                title_overlap
            } else {
                overlap_ratio(&job_body, &exp_all)
            };
            TITLE_SHARE * title_overlap + (1.0 - TITLE_SHARE) * body_overlap
        })
        .fold(0.0_f32, f32::max)
}

/// |reference ∩ other| / |reference|
fn overlap_ratio(reference: &HashSet<String>, other: &HashSet<String>) -> f32 {
    if reference.is_empty() {
        return 0.0;
    }
    reference.intersection(other).count() as f32 / reference.len() as f32
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// A job skill the candidate lacks or holds below the requested level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub required: bool,
    pub required_level: Option<SkillLevel>,
    /// `None` when the skill is absent from the CV.
    pub candidate_level: Option<SkillLevel>,
}

#[derive(Debug, Clone)]
pub struct SkillsAssessment {
    pub score: f32,
    /// Job skills held at or above the requested level.
    pub strengths: Vec<String>,
    pub gaps: Vec<SkillGap>,
}

/// Weighted mean over job skills of min(1, candidate level / requested level).
/// Required skills weigh 1.0, optional ones 0.5. Missing skills score 0.
pub fn skills_level(cv: &ParsedCv, job: &ParsedJob) -> SkillsAssessment {
    if job.required_skills.is_empty() {
        return SkillsAssessment {
            score: NEUTRAL,
            strengths: Vec::new(),
            gaps: Vec::new(),
        };
    }

    // Declared skills carry a level; skills only listed under an experience
    // count as intermediate.
    let candidate: Vec<(Vec<String>, SkillLevel)> = cv
        .skills
        .iter()
        .map(|s| (tokens(&s.name), s.level_or_default()))
        .chain(
            cv.experiences
                .iter()
                .flat_map(|e| e.skills.iter())
                .map(|name| (tokens(name), SkillLevel::default())),
        )
        .filter(|(t, _)| !t.is_empty())
        .collect();

    let mut strengths = Vec::new();
    let mut gaps = Vec::new();
    let mut total_weight = 0.0_f32;
    let mut total_value = 0.0_f32;

    for job_skill in &job.required_skills {
        let wanted = tokens(&job_skill.name);
        if wanted.is_empty() {
            continue;
        }
        let weight = if job_skill.required {
            1.0
        } else {
            OPTIONAL_SKILL_WEIGHT
        };
        total_weight += weight;

        let held = candidate
            .iter()
            .filter(|(name, _)| skill_names_match(name, &wanted))
            .map(|(_, level)| *level)
            .max();

        let value = match (held, job_skill.level) {
            (None, _) => 0.0,
            (Some(_), None) => 1.0,
            (Some(have), Some(need)) => (have.weight() / need.weight()).min(1.0),
        };
        total_value += weight * value;

        if value >= 1.0 {
            strengths.push(job_skill.name.clone());
        } else if held.is_some() || job_skill.required {
            gaps.push(SkillGap {
                skill: job_skill.name.clone(),
                required: job_skill.required,
                required_level: job_skill.level,
                candidate_level: held,
            });
        }
    }

    let score = if total_weight > 0.0 {
        (total_value / total_weight).clamp(0.0, 1.0)
    } else {
        NEUTRAL
    };

    SkillsAssessment {
        score,
        strengths,
        gaps,
    }
}

/// Equal token sequences, or one contained in the other as whole tokens
/// ("PostgreSQL" ~ "PostgreSQL avancé", "gestion de projet" ~ "gestion de projet agile").
fn skill_names_match(candidate: &[String], wanted: &[String]) -> bool {
    candidate == wanted || contains_phrase(candidate, wanted) || contains_phrase(wanted, candidate)
}

// ────────────────────────────────────────────────────────────────────────────
// Sector
// ────────────────────────────────────────────────────────────────────────────

/// 1.0 same sector, 0.6 related (shared words), 0.0 unrelated,
/// 0.3 when the CV names no sector, 0.5 when the posting names none.
pub fn sector_alignment(cv: &ParsedCv, job: &ParsedJob) -> f32 {
    let job_sector = match job.sector.as_deref().map(normalize) {
        Some(s) if !s.is_empty() => s,
        _ => return NEUTRAL,
    };

    let cv_sectors: Vec<String> = cv
        .all_sectors()
        .into_iter()
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect();

    if cv_sectors.is_empty() {
        return SECTOR_UNDECLARED;
    }
    if cv_sectors.iter().any(|s| *s == job_sector) {
        return 1.0;
    }

    let job_tokens = content_token_set(&job_sector);
    let related = cv_sectors
        .iter()
        .any(|s| !content_token_set(s).is_disjoint(&job_tokens));
    if related {
        SECTOR_PARTIAL
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{CvSkill, Experience};
    use crate::models::job::JobSkill;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn job_skill(name: &str, level: Option<SkillLevel>, required: bool) -> JobSkill {
        JobSkill {
            name: name.to_string(),
            level,
            required,
        }
    }

    fn cv_skill(name: &str, level: Option<SkillLevel>) -> CvSkill {
        CvSkill {
            name: name.to_string(),
            level,
            category: None,
        }
    }

    fn keyword(k: &str, w: f32) -> JobKeyword {
        JobKeyword {
            keyword: k.to_string(),
            weight: w,
        }
    }

    // ── keywords ──

    #[test]
    fn test_keyword_coverage_weighted() {
        let job = ParsedJob {
            keywords: vec![keyword("Rust", 1.0), keyword("Kafka", 0.5), keyword("gestion de projet", 0.5)],
            ..Default::default()
        };
        let cov = keyword_coverage("Développeur RUST, expérience en Gestion de Projet", &job);
        assert!((cov.score - 0.75).abs() < 1e-6, "score was {}", cov.score);
        assert_eq!(cov.matched, vec!["Rust", "gestion de projet"]);
        assert_eq!(cov.missing.len(), 1);
        assert_eq!(cov.missing[0].keyword, "Kafka");
    }

    #[test]
    fn test_keyword_coverage_is_accent_insensitive_and_whole_token() {
        let job = ParsedJob {
            keywords: vec![keyword("sécurité", 1.0), keyword("java", 1.0)],
            ..Default::default()
        };
        let cov = keyword_coverage("Expert securite réseau, JavaScript", &job);
        assert_eq!(cov.matched, vec!["sécurité"]);
        assert_eq!(cov.missing[0].keyword, "java");
    }

    #[test]
    fn test_missing_keywords_sorted_by_weight() {
        let job = ParsedJob {
            keywords: vec![keyword("a11y", 0.3), keyword("terraform", 0.9), keyword("go", 0.6)],
            ..Default::default()
        };
        let cov = keyword_coverage("rien à voir", &job);
        let order: Vec<&str> = cov.missing.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(order, vec!["terraform", "go", "a11y"]);
        assert_eq!(cov.score, 0.0);
    }

    #[test]
    fn test_keyword_coverage_neutral_without_keywords() {
        let cov = keyword_coverage("n'importe quoi", &ParsedJob::default());
        assert_eq!(cov.score, NEUTRAL);
    }

    #[test]
    fn test_keyword_coverage_falls_back_to_skills() {
        let job = ParsedJob {
            required_skills: vec![job_skill("SQL", None, true), job_skill("Python", None, false)],
            ..Default::default()
        };
        let cov = keyword_coverage("Requêtes SQL complexes", &job);
        assert!((cov.score - 1.0 / 1.5).abs() < 1e-6);
    }

    // ── experience ──

    fn experienced_cv() -> ParsedCv {
        ParsedCv {
            experiences: vec![Experience {
                title: "Développeur Backend".to_string(),
                start_date: Some("2020-06".to_string()),
                end_date: None,
                description: Some("Conception d'API de paiement".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_experience_full_when_years_and_title_match() {
        let job = ParsedJob {
            title: "Développeur Backend".to_string(),
            min_experience_years: Some(3.0),
            ..Default::default()
        };
        let score = experience_relevance(&experienced_cv(), &job, today());
        assert!((score - 1.0).abs() < 1e-6, "score was {score}");
    }

    #[test]
    fn test_experience_years_ratio_when_below_minimum() {
        let job = ParsedJob {
            title: "Comptable".to_string(),
            min_experience_years: Some(8.0),
            ..Default::default()
        };
        // 4 years 1 month of 8 required, no title overlap
        let score = experience_relevance(&experienced_cv(), &job, today());
        let expected = YEARS_SHARE * (49.0 / 12.0 / 8.0);
        assert!((score - expected).abs() < 1e-4, "score was {score}");
    }

    #[test]
    fn test_experience_without_any_experience() {
        let job = ParsedJob {
            title: "Développeur".to_string(),
            min_experience_years: Some(2.0),
            ..Default::default()
        };
        assert_eq!(experience_relevance(&ParsedCv::default(), &job, today()), 0.0);
    }

    #[test]
    fn test_experience_undated_positions_get_neutral_years() {
        let cv = ParsedCv {
            experiences: vec![Experience {
                title: "Chef de rayon".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let job = ParsedJob {
            title: "Chef de rayon".to_string(),
            min_experience_years: Some(5.0),
            ..Default::default()
        };
        let score = experience_relevance(&cv, &job, today());
        assert!((score - (YEARS_SHARE * NEUTRAL + ROLE_SHARE)).abs() < 1e-6);
    }

    // ── skills ──

    #[test]
    fn test_skills_level_ratio() {
        let cv = ParsedCv {
            skills: vec![cv_skill("Rust", Some(SkillLevel::Intermediaire))],
            ..Default::default()
        };
        let job = ParsedJob {
            required_skills: vec![job_skill("Rust", Some(SkillLevel::Expert), true)],
            ..Default::default()
        };
        let assessment = skills_level(&cv, &job);
        assert!((assessment.score - 0.5).abs() < 1e-6);
        assert_eq!(assessment.gaps.len(), 1);
        assert_eq!(assessment.gaps[0].candidate_level, Some(SkillLevel::Intermediaire));
        assert!(assessment.strengths.is_empty());
    }

    #[test]
    fn test_missing_required_skill_is_a_gap_optional_is_not() {
        let cv = ParsedCv {
            skills: vec![cv_skill("PostgreSQL avancé", Some(SkillLevel::Avance))],
            ..Default::default()
        };
        let job = ParsedJob {
            required_skills: vec![
                job_skill("PostgreSQL", Some(SkillLevel::Avance), true),
                job_skill("Kubernetes", None, true),
                job_skill("Kafka", None, false),
            ],
            ..Default::default()
        };
        let assessment = skills_level(&cv, &job);
        // (1.0 + 0.0 + 0.5 * 0.0) / 2.5
        assert!((assessment.score - 0.4).abs() < 1e-6);
        assert_eq!(assessment.strengths, vec!["PostgreSQL"]);
        assert_eq!(assessment.gaps.len(), 1);
        assert_eq!(assessment.gaps[0].skill, "Kubernetes");
        assert!(assessment.gaps[0].candidate_level.is_none());
    }

    #[test]
    fn test_experience_skills_count_as_intermediate() {
        let cv = ParsedCv {
            experiences: vec![Experience {
                title: "Dev".to_string(),
                skills: vec!["Docker".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let job = ParsedJob {
            required_skills: vec![job_skill("docker", Some(SkillLevel::Avance), true)],
            ..Default::default()
        };
        let assessment = skills_level(&cv, &job);
        assert!((assessment.score - 0.5 / 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_skills_neutral_without_job_skills() {
        assert_eq!(skills_level(&ParsedCv::default(), &ParsedJob::default()).score, NEUTRAL);
    }

    // ── sector ──

    fn cv_with_sectors(sectors: &[&str]) -> ParsedCv {
        ParsedCv {
            sectors: sectors.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn job_in(sector: Option<&str>) -> ParsedJob {
        ParsedJob {
            sector: sector.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_sector_exact_match_accent_insensitive() {
        let cv = cv_with_sectors(&["Énergie"]);
        assert_eq!(sector_alignment(&cv, &job_in(Some("energie"))), 1.0);
    }

    #[test]
    fn test_sector_partial_match() {
        let cv = cv_with_sectors(&["Banque de détail"]);
        assert_eq!(sector_alignment(&cv, &job_in(Some("Banque d'investissement"))), SECTOR_PARTIAL);
    }

    #[test]
    fn test_sector_mismatch_and_unknowns() {
        let cv = cv_with_sectors(&["Aéronautique"]);
        assert_eq!(sector_alignment(&cv, &job_in(Some("Cosmétique"))), 0.0);
        assert_eq!(sector_alignment(&cv, &job_in(None)), NEUTRAL);
        assert_eq!(
            sector_alignment(&ParsedCv::default(), &job_in(Some("Cosmétique"))),
            SECTOR_UNDECLARED
        );
    }

    #[test]
    fn test_sector_uses_experience_sectors() {
        let cv = ParsedCv {
            experiences: vec![Experience {
                title: "Acheteur".to_string(),
                sector: Some("Automobile".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(sector_alignment(&cv, &job_in(Some("automobile"))), 1.0);
    }
}
