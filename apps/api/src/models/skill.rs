use serde::{Deserialize, Serialize};

use crate::text::normalize;

/// Proficiency scale used on French CVs and job postings.
///
/// Deserialization is lenient: French and English labels ("confirmé",
/// "senior", "beginner"…) are mapped onto the four levels, and anything
/// unrecognized falls back to `Intermediaire`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SkillLevel {
    Debutant,
    #[default]
    Intermediaire,
    Avance,
    Expert,
}

impl SkillLevel {
    /// Weight used by the skills sub-score.
    pub fn weight(self) -> f32 {
        match self {
            SkillLevel::Debutant => 0.25,
            SkillLevel::Intermediaire => 0.5,
            SkillLevel::Avance => 0.75,
            SkillLevel::Expert => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Debutant => "debutant",
            SkillLevel::Intermediaire => "intermediaire",
            SkillLevel::Avance => "avance",
            SkillLevel::Expert => "expert",
        }
    }

    pub fn from_label(label: &str) -> Option<SkillLevel> {
        let label = normalize(label);
        let level = match label.as_str() {
            "debutant" | "debutante" | "beginner" | "novice" | "notions" | "junior" | "basic"
            | "scolaire" | "a1" | "a2" => SkillLevel::Debutant,
            "intermediaire" | "intermediate" | "moyen" | "pratique" | "courant" | "b1" | "b2" => {
                SkillLevel::Intermediaire
            }
            "avance" | "avancee" | "advanced" | "confirme" | "confirmee" | "senior" | "maitrise"
            | "proficient" | "c1" => SkillLevel::Avance,
            "expert" | "experte" | "expertise" | "lead" | "bilingue" | "natif" | "native"
            | "langue maternelle" | "c2" => SkillLevel::Expert,
            _ => return None,
        };
        Some(level)
    }
}

impl From<String> for SkillLevel {
    fn from(label: String) -> Self {
        SkillLevel::from_label(&label).unwrap_or_default()
    }
}

impl From<SkillLevel> for String {
    fn from(level: SkillLevel) -> Self {
        level.as_str().to_string()
    }
}
