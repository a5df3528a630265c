//! LinkedIn Parser — extracts a profile from the copied text of a LinkedIn page.

use crate::errors::AppError;
use crate::extraction::cv_parser::dedup_list;
use crate::extraction::prepare_input;
use crate::extraction::prompts::{LINKEDIN_PARSE_PROMPT_TEMPLATE, LINKEDIN_PARSE_SYSTEM};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{call_json, LanguageModel};
use crate::models::clean_opt;
use crate::models::linkedin::LinkedInProfile;

pub async fn parse_linkedin(
    profile_text: &str,
    llm: &dyn LanguageModel,
) -> Result<LinkedInProfile, AppError> {
    let profile_text = prepare_input(profile_text, "profile_text")?;

    let prompt = LINKEDIN_PARSE_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{profile_text}", profile_text);

    let mut profile: LinkedInProfile = call_json(llm, &prompt, LINKEDIN_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("LinkedIn profile parsing failed: {e}")))?;

    profile.full_name = clean_opt(profile.full_name.take());
    profile.headline = clean_opt(profile.headline.take());
    profile.about = clean_opt(profile.about.take());
    profile.location = clean_opt(profile.location.take());
    profile.industry = clean_opt(profile.industry.take());
    for position in &mut profile.positions {
        position.title = position.title.trim().to_string();
        position.company = clean_opt(position.company.take());
        position.start_date = clean_opt(position.start_date.take());
        position.end_date = clean_opt(position.end_date.take());
        position.description = clean_opt(position.description.take());
    }
    profile
        .positions
        .retain(|p| !p.title.is_empty() || p.company.is_some());
    profile.skills = dedup_list(std::mem::take(&mut profile.skills));
    profile.certifications = dedup_list(std::mem::take(&mut profile.certifications));

    Ok(profile)
}
