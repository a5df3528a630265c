//! Structured résumé produced by `extraction::cv_parser`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{lenient_year, null_as_default};
use super::skill::SkillLevel;
use crate::text::normalize;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: Option<String>,
    /// Current or targeted job title ("Développeuse Full-Stack").
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub company: Option<String>,
    /// `YYYY-MM` (or `YYYY`). `None` when the CV does not say.
    pub start_date: Option<String>,
    /// `YYYY-MM`, `YYYY`, or `None` for an ongoing position.
    pub end_date: Option<String>,
    pub sector: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    pub institution: Option<String>,
    #[serde(deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    /// French level label, e.g. "Bac+5".
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CvSkill {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub level: Option<SkillLevel>,
    pub category: Option<String>,
}

impl CvSkill {
    pub fn level_or_default(&self) -> SkillLevel {
        self.level.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkill {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedCv {
    #[serde(deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experiences: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<CvSkill>,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<LanguageSkill>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sectors: Vec<String>,
}

impl ParsedCv {
    /// Total months of professional experience as of `today`.
    ///
    /// Overlapping positions are counted once. Positions without a parsable
    /// start date are ignored; a missing end date means the position is ongoing.
    /// Both ends are inclusive: Jan–Dec of one year is 12 months.
    pub fn total_experience_months(&self, today: NaiveDate) -> u32 {
        let today_idx = month_index(today);
        let mut periods: Vec<(i32, i32)> = self
            .experiences
            .iter()
            .filter_map(|exp| {
                let start = exp.start_date.as_deref().and_then(parse_month)?;
                let end = match exp.end_date.as_deref() {
                    None => today,
                    Some(raw) if is_ongoing(raw) => today,
                    Some(raw) => parse_month(raw)?,
                };
                let (s, e) = (month_index(start), month_index(end).min(today_idx));
                (s <= e).then_some((s, e))
            })
            .collect();

        periods.sort_unstable();

        let mut total = 0;
        let mut current: Option<(i32, i32)> = None;
        for (s, e) in periods {
            current = match current {
                Some((cs, ce)) if s <= ce + 1 => Some((cs, ce.max(e))),
                Some((cs, ce)) => {
                    total += ce - cs + 1;
                    Some((s, e))
                }
                None => Some((s, e)),
            };
        }
        if let Some((cs, ce)) = current {
            total += ce - cs + 1;
        }
        total.max(0) as u32
    }

    pub fn total_experience_years(&self, today: NaiveDate) -> f32 {
        self.total_experience_months(today) as f32 / 12.0
    }

    /// Declared skills plus skills listed under experiences, deduplicated on
    /// their normalized form.
    pub fn skill_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.skills
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.experiences.iter().flat_map(|e| e.skills.iter().map(String::as_str)))
            .filter(|name| seen.insert(normalize(name)))
            .map(str::to_string)
            .collect()
    }

    /// Declared sectors plus the sectors of each experience.
    pub fn all_sectors(&self) -> Vec<&str> {
        self.sectors
            .iter()
            .map(String::as_str)
            .chain(self.experiences.iter().filter_map(|e| e.sector.as_deref()))
            .collect()
    }

    /// Flattens the structured CV into text for embeddings and keyword overlap.
    pub fn plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        let info = &self.personal_info;
        lines.extend(info.full_name.clone());
        lines.extend(info.title.clone());
        lines.extend(self.summary.clone());

        for exp in &self.experiences {
            let mut header = exp.title.clone();
            if let Some(company) = &exp.company {
                header.push_str(" — ");
                header.push_str(company);
            }
            lines.push(header);
            lines.extend(exp.description.clone());
            lines.extend(exp.achievements.iter().map(|a| format!("- {a}")));
            if !exp.skills.is_empty() {
                lines.push(exp.skills.join(", "));
            }
        }

        for edu in &self.education {
            let mut line = edu.degree.clone();
            if let Some(inst) = &edu.institution {
                line.push_str(", ");
                line.push_str(inst);
            }
            lines.push(line);
        }

        if !self.skills.is_empty() {
            lines.push(
                self.skills
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        lines.extend(self.languages.iter().map(|l| l.name.clone()));
        lines.extend(self.certifications.iter().cloned());

        lines.retain(|l| !l.trim().is_empty());
        lines.join("\n")
    }
}

fn is_ongoing(raw: &str) -> bool {
    matches!(
        normalize(raw).as_str(),
        "" | "present" | "aujourd hui" | "actuel" | "actuellement" | "en cours" | "current"
            | "now" | "ce jour"
    )
}

/// Parses `YYYY-MM`, `YYYY-MM-DD`, `MM/YYYY` or `YYYY` into the first day of that month.
pub(crate) fn parse_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return NaiveDate::from_ymd_opt(date.year(), date.month(), 1);
    }
    let (year, month) = if let Some((y, m)) = raw.split_once('-') {
        (y.parse().ok()?, m.parse().ok()?)
    } else if let Some((m, y)) = raw.split_once('/') {
        (y.parse().ok()?, m.parse().ok()?)
    } else {
        (raw.parse().ok()?, 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}
