//! The résumé builder document: `basics`, ordered `sections`, `metadata`.
//!
//! This is the JSON the builder front-end edits and persists. The service
//! creates it from a parsed CV, reorders its sections, and flattens it back to
//! text for scoring.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::cv::ParsedCv;

pub const DEFAULT_TEMPLATE: &str = "classique";
pub const DEFAULT_LOCALE: &str = "fr-FR";

#[derive(Debug, Error, PartialEq)]
pub enum ReorderError {
    #[error("unknown section id '{0}'")]
    UnknownSection(String),

    #[error("section id '{0}' listed more than once")]
    DuplicateSection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Custom,
}

impl SectionKind {
    fn default_id(self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Languages => "languages",
            SectionKind::Certifications => "certifications",
            SectionKind::Custom => "custom",
        }
    }

    fn default_title(self) -> &'static str {
        match self {
            SectionKind::Summary => "Profil",
            SectionKind::Experience => "Expérience professionnelle",
            SectionKind::Education => "Formation",
            SectionKind::Skills => "Compétences",
            SectionKind::Languages => "Langues",
            SectionKind::Certifications => "Certifications",
            SectionKind::Custom => "Divers",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Basics {
    pub name: String,
    pub headline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionItem {
    pub id: Uuid,
    pub heading: String,
    #[serde(default)]
    pub subheading: Option<String>,
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl SectionItem {
    fn new(heading: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            heading: heading.into(),
            subheading: None,
            date_range: None,
            description: None,
            keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub kind: SectionKind,
    pub title: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub items: Vec<SectionItem>,
}

fn default_visible() -> bool {
    true
}

impl Section {
    fn new(kind: SectionKind, items: Vec<SectionItem>) -> Self {
        Self {
            id: kind.default_id().to_string(),
            kind,
            title: kind.default_title().to_string(),
            visible: true,
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub template: String,
    pub locale: String,
    pub section_order: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub basics: Basics,
    pub sections: Vec<Section>,
    pub metadata: Metadata,
}

impl ResumeDocument {
    /// Builds a document in the default French order:
    /// profil, expérience, formation, compétences, langues, certifications.
    /// Sections with nothing to show are left out.
    pub fn from_parsed_cv(cv: &ParsedCv) -> Self {
        let info = &cv.personal_info;
        let basics = Basics {
            name: info.full_name.clone().unwrap_or_default(),
            headline: info.title.clone(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            location: info.location.clone(),
            url: None,
        };

        let summary: Vec<SectionItem> = cv
            .summary
            .iter()
            .map(|s| SectionItem {
                description: Some(s.clone()),
                ..SectionItem::new("Profil")
            })
            .collect();

        let experience = cv
            .experiences
            .iter()
            .map(|exp| {
                let mut description: Vec<String> = exp.description.iter().cloned().collect();
                description.extend(exp.achievements.iter().map(|a| format!("• {a}")));
                SectionItem {
                    subheading: exp.company.clone(),
                    date_range: format_date_range(exp.start_date.as_deref(), exp.end_date.as_deref()),
                    description: (!description.is_empty()).then(|| description.join("\n")),
                    keywords: exp.skills.clone(),
                    ..SectionItem::new(exp.title.clone())
                }
            })
            .collect();

        let education = cv
            .education
            .iter()
            .map(|edu| SectionItem {
                subheading: edu.institution.clone(),
                date_range: edu.year.map(|y| y.to_string()),
                description: edu.level.clone(),
                ..SectionItem::new(edu.degree.clone())
            })
            .collect();

        let skills = cv
            .skills
            .iter()
            .map(|skill| SectionItem {
                subheading: skill.level.map(|l| l.as_str().to_string()),
                ..SectionItem::new(skill.name.clone())
            })
            .collect();

        let languages = cv
            .languages
            .iter()
            .map(|lang| SectionItem {
                subheading: lang.level.clone(),
                ..SectionItem::new(lang.name.clone())
            })
            .collect();

        let certifications = cv
            .certifications
            .iter()
            .map(|c| SectionItem::new(c.clone()))
            .collect();

        let sections: Vec<Section> = [
            (SectionKind::Summary, summary),
            (SectionKind::Experience, experience),
            (SectionKind::Education, education),
            (SectionKind::Skills, skills),
            (SectionKind::Languages, languages),
            (SectionKind::Certifications, certifications),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(kind, items)| Section::new(kind, items))
        .collect();

        let section_order = sections.iter().map(|s| s.id.clone()).collect();

        Self {
            basics,
            sections,
            metadata: Metadata {
                template: DEFAULT_TEMPLATE.to_string(),
                locale: DEFAULT_LOCALE.to_string(),
                section_order,
                updated_at: Utc::now(),
            },
        }
    }

    /// Moves the listed sections to the front, in the given order. Sections not
    /// listed keep their relative order after them.
    pub fn reorder_sections(&mut self, order: &[String]) -> Result<(), ReorderError> {
        let known: HashSet<&str> = self.sections.iter().map(|s| s.id.as_str()).collect();
        let mut seen = HashSet::new();
        for id in order {
            if !known.contains(id.as_str()) {
                return Err(ReorderError::UnknownSection(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(ReorderError::DuplicateSection(id.clone()));
            }
        }

        let mut remaining = std::mem::take(&mut self.sections);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(pos) = remaining.iter().position(|s| &s.id == id) {
                reordered.push(remaining.remove(pos));
            }
        }
        reordered.extend(remaining);

        self.sections = reordered;
        self.metadata.section_order = self.sections.iter().map(|s| s.id.clone()).collect();
        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// Visible content in document order, for scoring.
    pub fn plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if !self.basics.name.is_empty() {
            lines.push(self.basics.name.clone());
        }
        lines.extend(self.basics.headline.clone());

        for section in self.sections.iter().filter(|s| s.visible) {
            lines.push(section.title.clone());
            for item in &section.items {
                let mut header = item.heading.clone();
                if let Some(sub) = &item.subheading {
                    header.push_str(" — ");
                    header.push_str(sub);
                }
                if let Some(dates) = &item.date_range {
                    header.push_str(&format!(" ({dates})"));
                }
                lines.push(header);
                lines.extend(item.description.clone());
                if !item.keywords.is_empty() {
                    lines.push(item.keywords.join(", "));
                }
            }
        }

        lines.retain(|l| !l.trim().is_empty());
        lines.join("\n")
    }
}

fn format_date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start, end) {
        (None, None) => None,
        (Some(s), None) => Some(format!("{s} – aujourd'hui")),
        (None, Some(e)) => Some(e.to_string()),
        (Some(s), Some(e)) => Some(format!("{s} – {e}")),
    }
}
