//! Extraction — turns free text (CV, job posting, LinkedIn profile) into
//! structured models through the LLM, then cleans up what the model returned.
//!
//! All LLM calls go through `llm_client`.

pub mod cv_parser;
pub mod handlers;
pub mod job_parser;
pub mod linkedin_parser;
pub mod prompts;

use tracing::warn;

use crate::errors::AppError;

/// Inputs longer than this are truncated before being sent to the model.
pub const MAX_INPUT_CHARS: usize = 30_000;

/// Rejects blank input and truncates oversized input on a char boundary.
pub fn prepare_input<'a>(text: &'a str, field: &str) -> Result<&'a str, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }

    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((byte_idx, _)) => {
            warn!(
                "{field} exceeds {MAX_INPUT_CHARS} characters; truncating before extraction"
            );
            Ok(&text[..byte_idx])
        }
        None => Ok(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_input_rejects_blank() {
        let err = prepare_input("   \n\t", "cv_text").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("cv_text")));
    }

    #[test]
    fn test_prepare_input_trims() {
        assert_eq!(prepare_input("  bonjour  ", "cv_text").unwrap(), "bonjour");
    }

    #[test]
    fn test_prepare_input_truncates_on_char_boundary() {
        let long = "é".repeat(MAX_INPUT_CHARS + 10);
        let prepared = prepare_input(&long, "cv_text").unwrap();
        assert_eq!(prepared.chars().count(), MAX_INPUT_CHARS);
    }
}
