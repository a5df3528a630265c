//! Dossier (recruitment case file) and ranking result types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::MatchReport;
use crate::models::job::{ContractType, JobKeyword, JobSkill, ParsedJob};
use crate::models::null_as_default;
use crate::models::skill::SkillLevel;

pub const DEFAULT_SHORTLIST_THRESHOLD: u32 = 60;

fn default_true() -> bool {
    true
}

fn default_threshold() -> u32 {
    DEFAULT_SHORTLIST_THRESHOLD
}

/// A skill the client asks for, with the expected level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillProfile {
    pub skill: String,
    #[serde(default)]
    pub level: Option<SkillLevel>,
    #[serde(default = "default_true")]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dossier {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub client_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contract_type: ContractType,
    #[serde(default)]
    pub min_experience_years: Option<f32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillProfile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_threshold")]
    pub shortlist_threshold: u32,
}

impl Dossier {
    /// The dossier seen as a job posting. Without explicit keywords the skill
    /// names become the keywords.
    pub fn to_job(&self) -> ParsedJob {
        let required_skills: Vec<JobSkill> = self
            .skills
            .iter()
            .filter(|s| !s.skill.trim().is_empty())
            .map(|s| JobSkill {
                name: s.skill.trim().to_string(),
                level: s.level,
                required: s.required,
            })
            .collect();

        let keyword_source: Vec<&str> = if self.keywords.is_empty() {
            required_skills.iter().map(|s| s.name.as_str()).collect()
        } else {
            self.keywords.iter().map(String::as_str).collect()
        };
        let keywords = keyword_source
            .into_iter()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| JobKeyword {
                keyword: k.to_string(),
                weight: 1.0,
            })
            .collect();

        let responsibilities = self
            .description
            .as_deref()
            .unwrap_or("")
            .lines()
            .map(|l| l.trim().trim_start_matches(['-', '*', '•']).trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        ParsedJob {
            title: self.title.trim().to_string(),
            company: self.client_name.clone(),
            location: self.location.clone(),
            contract_type: self.contract_type,
            sector: self.sector.clone(),
            seniority: None,
            min_experience_years: self.min_experience_years,
            required_skills,
            keywords,
            responsibilities,
            salary: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateInput {
    pub name: String,
    pub cv_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    pub name: String,
    pub overall_score: u32,
    pub shortlisted: bool,
    pub report: MatchReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateFailure {
    pub name: String,
    /// Same code as the HTTP error envelope, e.g. `LLM_ERROR`.
    pub code: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingResult {
    pub dossier_id: Uuid,
    /// Best score first; equal scores in name order.
    pub matches: Vec<CandidateMatch>,
    pub failures: Vec<CandidateFailure>,
    pub shortlisted_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dossier_defaults() {
        let dossier: Dossier = serde_json::from_str(
            r#"{"title": "Comptable", "skills": [{"skill": "Sage"}], "keywords": null}"#,
        )
        .unwrap();
        assert_eq!(dossier.shortlist_threshold, DEFAULT_SHORTLIST_THRESHOLD);
        assert!(dossier.skills[0].required);
        assert_eq!(dossier.contract_type, ContractType::Inconnu);
        assert!(dossier.keywords.is_empty());
    }

    #[test]
    fn test_to_job_uses_skill_names_as_keywords() {
        let dossier: Dossier = serde_json::from_str(
            r#"{
                "title": " Chargé de recrutement ",
                "contract_type": "CDD",
                "skills": [
                    {"skill": "Sourcing", "level": "avance"},
                    {"skill": "LinkedIn Recruiter", "required": false},
                    {"skill": "  "}
                ],
                "description": "- Qualifier les besoins\n\n- Conduire les entretiens"
            }"#,
        )
        .unwrap();

        let job = dossier.to_job();
        assert_eq!(job.title, "Chargé de recrutement");
        assert_eq!(job.contract_type, ContractType::Cdd);
        assert_eq!(job.required_skills.len(), 2);
        assert!(!job.required_skills[1].required);
        let keywords: Vec<&str> = job.keywords.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Sourcing", "LinkedIn Recruiter"]);
        assert_eq!(
            job.responsibilities,
            vec!["Qualifier les besoins", "Conduire les entretiens"]
        );
    }

    #[test]
    fn test_to_job_prefers_explicit_keywords() {
        let dossier: Dossier = serde_json::from_str(
            r#"{"title": "Comptable", "skills": [{"skill": "Sage"}], "keywords": ["clôture", " "]}"#,
        )
        .unwrap();
        let job = dossier.to_job();
        assert_eq!(job.keywords.len(), 1);
        assert_eq!(job.keywords[0].keyword, "clôture");
    }
}
