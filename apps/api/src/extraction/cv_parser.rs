//! CV Parser — extracts a structured `ParsedCv` from raw résumé text.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::AppError;
use crate::extraction::prepare_input;
use crate::extraction::prompts::{CV_PARSE_PROMPT_TEMPLATE, CV_PARSE_SYSTEM};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{call_json, LanguageModel};
use crate::models::clean_opt;
use crate::models::cv::{CvSkill, ParsedCv};
use crate::text::normalize;

/// Sends the CV to the LLM and returns the cleaned-up structure.
pub async fn parse_cv(cv_text: &str, llm: &dyn LanguageModel) -> Result<ParsedCv, AppError> {
    let cv_text = prepare_input(cv_text, "cv_text")?;

    let prompt = CV_PARSE_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{cv_text}", cv_text);

    let parsed: ParsedCv = call_json(llm, &prompt, CV_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("CV parsing failed: {e}")))?;

    let cv = normalize_cv(parsed);
    debug!(
        "CV parsed: {} experiences, {} skills",
        cv.experiences.len(),
        cv.skills.len()
    );
    Ok(cv)
}

/// Trims every field, drops empty entries and merges duplicate skills.
pub fn normalize_cv(mut cv: ParsedCv) -> ParsedCv {
    let info = &mut cv.personal_info;
    info.full_name = clean_opt(info.full_name.take());
    info.title = clean_opt(info.title.take());
    info.email = clean_opt(info.email.take());
    info.phone = clean_opt(info.phone.take());
    info.location = clean_opt(info.location.take());
    cv.summary = clean_opt(cv.summary.take());

    for exp in &mut cv.experiences {
        exp.title = exp.title.trim().to_string();
        exp.company = clean_opt(exp.company.take());
        exp.start_date = clean_opt(exp.start_date.take());
        exp.end_date = clean_opt(exp.end_date.take());
        exp.sector = clean_opt(exp.sector.take());
        exp.description = clean_opt(exp.description.take());
        exp.achievements = clean_list(std::mem::take(&mut exp.achievements));
        exp.skills = dedup_list(std::mem::take(&mut exp.skills));
    }
    cv.experiences
        .retain(|e| !e.title.is_empty() || e.company.is_some());

    for edu in &mut cv.education {
        edu.degree = edu.degree.trim().to_string();
        edu.institution = clean_opt(edu.institution.take());
        edu.level = clean_opt(edu.level.take());
    }
    cv.education.retain(|e| !e.degree.is_empty());

    cv.skills = merge_skills(std::mem::take(&mut cv.skills));

    for lang in &mut cv.languages {
        lang.name = lang.name.trim().to_string();
        lang.level = clean_opt(lang.level.take());
    }
    cv.languages.retain(|l| !l.name.is_empty());

    cv.certifications = dedup_list(std::mem::take(&mut cv.certifications));
    cv.sectors = dedup_list(std::mem::take(&mut cv.sectors));
    cv
}

/// Keeps one entry per normalized skill name, with the highest stated level.
fn merge_skills(skills: Vec<CvSkill>) -> Vec<CvSkill> {
    let mut merged: Vec<CvSkill> = Vec::with_capacity(skills.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for mut skill in skills {
        skill.name = skill.name.trim().to_string();
        if skill.name.is_empty() {
            continue;
        }
        skill.category = clean_opt(skill.category.take());
        let key = normalize(&skill.name);
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.level = existing.level.max(skill.level);
                if existing.category.is_none() {
                    existing.category = skill.category;
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(skill);
            }
        }
    }
    merged
}

pub(crate) fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trims, drops blanks and removes accent/case-insensitive duplicates, keeping
/// the first spelling.
pub(crate) fn dedup_list(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    clean_list(items)
        .into_iter()
        .filter(|s| seen.insert(normalize(s)))
        .collect()
}
