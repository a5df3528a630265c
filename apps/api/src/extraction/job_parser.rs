//! Job Parser — extracts requirements, weighted keywords and contract details from a job posting.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::AppError;
use crate::extraction::cv_parser::clean_list;
use crate::extraction::prepare_input;
use crate::extraction::prompts::{JOB_PARSE_PROMPT_TEMPLATE, JOB_PARSE_SYSTEM};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{call_json, LanguageModel};
use crate::models::clean_opt;
use crate::models::job::{JobKeyword, JobSkill, ParsedJob};
use crate::text::normalize;

/// Sends the posting to the LLM and returns the cleaned-up structure.
pub async fn parse_job(job_text: &str, llm: &dyn LanguageModel) -> Result<ParsedJob, AppError> {
    let job_text = prepare_input(job_text, "job_text")?;

    let prompt = JOB_PARSE_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{job_text}", job_text);

    let parsed: ParsedJob = call_json(llm, &prompt, JOB_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Job posting parsing failed: {e}")))?;

    let job = normalize_job(parsed);
    debug!(
        "Job parsed: '{}' with {} skills, {} keywords",
        job.title,
        job.required_skills.len(),
        job.keywords.len()
    );
    Ok(job)
}

pub fn normalize_job(mut job: ParsedJob) -> ParsedJob {
    job.title = job.title.trim().to_string();
    job.company = clean_opt(job.company.take());
    job.location = clean_opt(job.location.take());
    job.sector = clean_opt(job.sector.take());
    job.seniority = clean_opt(job.seniority.take());
    job.min_experience_years = job
        .min_experience_years
        .filter(|y| y.is_finite() && *y >= 0.0);
    job.required_skills = merge_job_skills(std::mem::take(&mut job.required_skills));
    job.keywords = merge_keywords(std::mem::take(&mut job.keywords));
    job.responsibilities = clean_list(std::mem::take(&mut job.responsibilities));
    job.salary = job.salary.take().and_then(|s| s.normalized());
    job
}

/// One entry per normalized name: required if any duplicate is required,
/// highest stated level wins.
fn merge_job_skills(skills: Vec<JobSkill>) -> Vec<JobSkill> {
    let mut merged: Vec<JobSkill> = Vec::with_capacity(skills.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for mut skill in skills {
        skill.name = skill.name.trim().to_string();
        if skill.name.is_empty() {
            continue;
        }
        let key = normalize(&skill.name);
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.required |= skill.required;
                existing.level = existing.level.max(skill.level);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(skill);
            }
        }
    }
    merged
}

/// Clamps weights into [0, 1] (non-finite → 1.0) and keeps the highest weight per keyword.
fn merge_keywords(keywords: Vec<JobKeyword>) -> Vec<JobKeyword> {
    let mut merged: Vec<JobKeyword> = Vec::with_capacity(keywords.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for mut kw in keywords {
        kw.keyword = kw.keyword.trim().to_string();
        let key = normalize(&kw.keyword);
        if key.is_empty() {
            continue;
        }
        kw.weight = if kw.weight.is_finite() {
            kw.weight.clamp(0.0, 1.0)
        } else {
            1.0
        };
        match index.get(&key) {
            Some(&i) => merged[i].weight = merged[i].weight.max(kw.weight),
            None => {
                index.insert(key, merged.len());
                merged.push(kw);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FakeLanguageModel;
    use crate::models::job::ContractType;
    use crate::models::skill::SkillLevel;

    const STARTUP_JOB: &str = r#"
        Développeur Backend Rust (H/F) — CDI — Paris 11e
        Rejoignez une scale-up de la fintech. Vous concevrez nos services de paiement.
        Profil : 4 ans minimum d'expérience, maîtrise de Rust et PostgreSQL indispensable.
        Kafka est un plus. Salaire : 55-65 k€.
    "#;

    const JOB_JSON: &str = r#"{
        "title": " Développeur Backend Rust ",
        "company": "",
        "contract_type": "CDI",
        "sector": "Fintech",
        "min_experience_years": -2,
        "required_skills": [
            {"name": "Rust", "level": "avance", "required": true},
            {"name": "rust", "level": "expert", "required": false},
            {"name": "Kafka", "required": false}
        ],
        "keywords": [
            {"keyword": "Rust", "weight": 1.7},
            {"keyword": "rust", "weight": 0.4},
            {"keyword": "paiement", "weight": 0.6},
            {"keyword": "  ", "weight": 1.0}
        ],
        "responsibilities": ["Concevoir les services de paiement", ""],
        "salary": {"min": 65000, "max": 55000}
    }"#;

    #[tokio::test]
    async fn test_parse_job_normalizes_llm_output() {
        let llm = FakeLanguageModel::new().respond(JOB_PARSE_SYSTEM, JOB_JSON);
        let job = parse_job(STARTUP_JOB, &llm).await.unwrap();

        assert_eq!(job.title, "Développeur Backend Rust");
        assert!(job.company.is_none());
        assert_eq!(job.contract_type, ContractType::Cdi);
        assert!(job.min_experience_years.is_none());
        assert_eq!(job.responsibilities.len(), 1);

        let salary = job.salary.unwrap();
        assert_eq!((salary.min, salary.max), (Some(55_000), Some(65_000)));
    }

    #[tokio::test]
    async fn test_duplicate_job_skills_merge() {
        let llm = FakeLanguageModel::new().respond(JOB_PARSE_SYSTEM, JOB_JSON);
        let job = parse_job(STARTUP_JOB, &llm).await.unwrap();

        assert_eq!(job.required_skills.len(), 2);
        let rust = &job.required_skills[0];
        assert!(rust.required);
        assert_eq!(rust.level, Some(SkillLevel::Expert));
        assert!(!job.required_skills[1].required);
    }

    #[tokio::test]
    async fn test_keyword_weights_clamped_and_deduped() {
        let llm = FakeLanguageModel::new().respond(JOB_PARSE_SYSTEM, JOB_JSON);
        let job = parse_job(STARTUP_JOB, &llm).await.unwrap();

        assert_eq!(job.keywords.len(), 2);
        assert_eq!(job.keywords[0].keyword, "Rust");
        assert_eq!(job.keywords[0].weight, 1.0);
        assert!((job.keywords[1].weight - 0.6).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_null_names_and_textual_numbers_tolerated() {
        let llm = FakeLanguageModel::new().respond(
            JOB_PARSE_SYSTEM,
            r#"{
                "title": "Consultant SAP FI",
                "contract_type": "freelance",
                "min_experience_years": "5",
                "required_skills": [{"name": null}, {"name": "SAP FI"}],
                "keywords": [{"keyword": null, "weight": 0.9}, {"keyword": "S/4HANA", "weight": "0,8"}],
                "salary": {"min": 450.5, "max": "600", "period": "journalier"}
            }"#,
        );
        let job = parse_job("Mission SAP FI, TJM 450-600 €", &llm).await.unwrap();

        assert_eq!(job.min_experience_years, Some(5.0));
        assert_eq!(job.required_skills.len(), 1);
        assert_eq!(job.required_skills[0].name, "SAP FI");
        assert_eq!(job.keywords.len(), 1);
        assert!((job.keywords[0].weight - 0.8).abs() < 1e-6);
        let salary = job.salary.unwrap();
        assert_eq!((salary.min, salary.max), (Some(451), Some(600)));
    }

    #[tokio::test]
    async fn test_parse_job_rejects_empty_text() {
        let llm = FakeLanguageModel::new();
        let result = parse_job("", &llm).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
