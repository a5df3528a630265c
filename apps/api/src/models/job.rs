//! Structured job posting produced by `extraction::job_parser`.

use serde::{Deserialize, Deserializer, Serialize};

use super::{lenient_f32, lenient_u32, null_as_default};
use super::skill::SkillLevel;
use crate::text::normalize;

/// French contract types. Unrecognized labels map to `Inconnu`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContractType {
    Cdi,
    Cdd,
    Freelance,
    Stage,
    Alternance,
    Interim,
    #[default]
    Inconnu,
}

impl ContractType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractType::Cdi => "cdi",
            ContractType::Cdd => "cdd",
            ContractType::Freelance => "freelance",
            ContractType::Stage => "stage",
            ContractType::Alternance => "alternance",
            ContractType::Interim => "interim",
            ContractType::Inconnu => "inconnu",
        }
    }
}

impl From<String> for ContractType {
    fn from(label: String) -> Self {
        match normalize(&label).as_str() {
            "cdi" | "permanent" | "full time" | "contrat a duree indeterminee" => ContractType::Cdi,
            "cdd" | "fixed term" | "temporary" | "contrat a duree determinee" => ContractType::Cdd,
            "freelance" | "independant" | "portage salarial" | "contractor" | "mission" => {
                ContractType::Freelance
            }
            "stage" | "internship" | "stagiaire" => ContractType::Stage,
            "alternance" | "apprentissage" | "contrat de professionnalisation" | "apprenticeship" => {
                ContractType::Alternance
            }
            "interim" | "temp" => ContractType::Interim,
            _ => ContractType::Inconnu,
        }
    }
}

impl From<ContractType> for String {
    fn from(contract: ContractType) -> Self {
        contract.as_str().to_string()
    }
}

fn default_true() -> bool {
    true
}

fn default_weight() -> f32 {
    1.0
}

fn null_as_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Missing, null or non-numeric weights count as full weight.
fn lenient_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(lenient_f32(deserializer)?.unwrap_or(1.0))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSkill {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub level: Option<SkillLevel>,
    /// `false` for "souhaité" / "un plus" skills.
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub required: bool,
}

/// A keyword from the posting with its importance in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobKeyword {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyword: String,
    #[serde(default = "default_weight", deserialize_with = "lenient_weight")]
    pub weight: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryRange {
    #[serde(deserialize_with = "lenient_u32")]
    pub min: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub max: Option<u32>,
    pub currency: Option<String>,
    /// "annuel", "mensuel", "journalier" (TJM)…
    pub period: Option<String>,
}

impl SalaryRange {
    /// Swaps inverted bounds. Returns `None` when both bounds are missing.
    pub fn normalized(mut self) -> Option<SalaryRange> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                self.min = Some(max);
                self.max = Some(min);
            }
        }
        if self.min.is_none() && self.max.is_none() {
            return None;
        }
        if self.currency.is_none() {
            self.currency = Some("EUR".to_string());
        }
        Some(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedJob {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contract_type: ContractType,
    pub sector: Option<String>,
    /// "junior", "confirmé", "senior"…
    pub seniority: Option<String>,
    #[serde(deserialize_with = "lenient_f32")]
    pub min_experience_years: Option<f32>,
    #[serde(deserialize_with = "null_as_default")]
    pub required_skills: Vec<JobSkill>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<JobKeyword>,
    #[serde(deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    pub salary: Option<SalaryRange>,
}

impl ParsedJob {
    /// Keywords used by the keyword sub-score. Falls back to skill names
    /// (required 1.0, optional 0.5) when the posting yielded no keywords.
    pub fn effective_keywords(&self) -> Vec<JobKeyword> {
        if !self.keywords.is_empty() {
            return self.keywords.clone();
        }
        self.required_skills
            .iter()
            .map(|s| JobKeyword {
                keyword: s.name.clone(),
                weight: if s.required { 1.0 } else { 0.5 },
            })
            .collect()
    }

    /// Flattens the posting into text for embeddings.
    pub fn plain_text(&self) -> String {
        let mut lines: Vec<String> = vec![self.title.clone()];
        lines.extend(self.company.clone());
        lines.extend(self.sector.clone());
        lines.extend(self.responsibilities.iter().map(|r| format!("- {r}")));
        if !self.required_skills.is_empty() {
            lines.push(
                self.required_skills
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        if !self.keywords.is_empty() {
            lines.push(
                self.keywords
                    .iter()
                    .map(|k| k.keyword.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        lines.retain(|l| !l.trim().is_empty());
        lines.join("\n")
    }
}
