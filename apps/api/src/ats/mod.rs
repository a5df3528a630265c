//! ATS Audit — pure-Rust checks of how well a CV survives applicant tracking
//! systems. No LLM call.
//!
//! Every issue has a severity, a stable code and a French message. The score
//! starts at 100 and loses a fixed amount per issue.

pub mod handlers;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::text::tokens;

const CRITICAL_PENALTY: u32 = 25;
const WARNING_PENALTY: u32 = 10;
const INFO_PENALTY: u32 = 3;

const MIN_WORDS: usize = 150;
const MAX_WORDS: usize = 1200;
const MAX_UPPERCASE_RATIO: f32 = 0.3;
/// Below this many letters the upper-case ratio is not meaningful.
const MIN_LETTERS_FOR_CASE_CHECK: usize = 40;
/// Longest line still treated as a possible section heading.
const MAX_HEADING_TOKENS: usize = 4;

const DECORATIVE_GLYPHS: &[char] = &[
    '★', '☆', '●', '○', '■', '□', '▪', '◆', '◇', '♦', '✓', '✔', '✗', '✘', '→', '⇒', '➤', '►',
    '▶', '❖', '✦', '✧', '─', '│', '┌', '┐', '└', '┘',
];
const BULLET_MARKERS: &[char] = &['-', '*', '•', '–', '▪', '◦'];

/// Standard headings: (section, normalized tokens that announce it, severity when absent).
const SECTIONS: &[(&str, &[&str], Severity)] = &[
    (
        "experience",
        &["experience", "experiences", "parcours"],
        Severity::Warning,
    ),
    (
        "formation",
        &["formation", "formations", "diplome", "diplomes", "etudes", "education", "cursus"],
        Severity::Warning,
    ),
    (
        "competences",
        &["competence", "competences", "skills"],
        Severity::Warning,
    ),
    ("langues", &["langue", "langues", "languages"], Severity::Info),
];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    fn penalty(self) -> u32 {
        match self {
            Severity::Critical => CRITICAL_PENALTY,
            Severity::Warning => WARNING_PENALTY,
            Severity::Info => INFO_PENALTY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

impl AtsIssue {
    fn new(severity: Severity, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub score: u32, // 0 – 100
    pub issues: Vec<AtsIssue>,
    pub detected_sections: Vec<String>,
    pub word_count: usize,
}

struct Patterns {
    email: Regex,
    french_phone: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")?,
            french_phone: Regex::new(r"(?:\+33\s?(?:\(0\)\s?)?|0033\s?|\b0)[1-9](?:[\s.-]?\d{2}){4}\b")?,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Audit
// ────────────────────────────────────────────────────────────────────────────

/// Audits a plain-text CV. Blank input is a validation error.
pub fn check_ats_compatibility(text: &str) -> Result<AtsReport, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("cv_text cannot be empty".to_string()));
    }
    let patterns = Patterns::compile()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid ATS pattern: {e}")))?;

    let mut issues = Vec::new();

    // Contact details
    if !patterns.email.is_match(text) {
        issues.push(AtsIssue::new(
            Severity::Critical,
            "missing_email",
            "Aucune adresse e-mail détectée : les recruteurs ne pourront pas vous contacter.",
        ));
    }
    if !patterns.french_phone.is_match(text) {
        issues.push(AtsIssue::new(
            Severity::Warning,
            "missing_phone",
            "Aucun numéro de téléphone français détecté (ex. 06 12 34 56 78 ou +33 6 12 34 56 78).",
        ));
    }

    // Section headings
    let detected_sections = detect_sections(text);
    for (section, _, severity) in SECTIONS {
        if !detected_sections.iter().any(|s| s == section) {
            issues.push(AtsIssue::new(
                *severity,
                &format!("missing_section_{section}"),
                format!("Rubrique « {} » introuvable : utilisez un intitulé standard.", section_label(section)),
            ));
        }
    }

    // Length
    let word_count = count_words(text);
    if word_count < MIN_WORDS {
        issues.push(AtsIssue::new(
            Severity::Warning,
            "too_short",
            format!("CV trop court ({word_count} mots) : visez au moins {MIN_WORDS} mots."),
        ));
    } else if word_count > MAX_WORDS {
        issues.push(AtsIssue::new(
            Severity::Warning,
            "too_long",
            format!("CV trop long ({word_count} mots) : restez sous {MAX_WORDS} mots."),
        ));
    }

    // Layout
    if text.chars().any(|c| DECORATIVE_GLYPHS.contains(&c)) {
        issues.push(AtsIssue::new(
            Severity::Warning,
            "decorative_glyphs",
            "Symboles décoratifs détectés (★, ●, ✓, →…) : ils sont souvent mal lus par les ATS.",
        ));
    }
    if has_table_layout(text) {
        issues.push(AtsIssue::new(
            Severity::Warning,
            "table_layout",
            "Mise en page en tableau ou en colonnes détectée : préférez un texte linéaire.",
        ));
    }

    // Style
    if uppercase_ratio(text) > MAX_UPPERCASE_RATIO {
        issues.push(AtsIssue::new(
            Severity::Info,
            "excessive_uppercase",
            "Trop de majuscules : réservez-les aux intitulés de rubrique.",
        ));
    }
    if mostly_unquantified(text) {
        issues.push(AtsIssue::new(
            Severity::Info,
            "unquantified_achievements",
            "La plupart des réalisations ne sont pas chiffrées : ajoutez des résultats mesurables (%, €, délais, volumes).",
        ));
    }

    Ok(AtsReport {
        score: score_issues(&issues),
        issues,
        detected_sections,
        word_count,
    })
}

/// 100 minus the penalty of every issue, floored at 0.
pub fn score_issues(issues: &[AtsIssue]) -> u32 {
    let penalty: u32 = issues.iter().map(|i| i.severity.penalty()).sum();
    100u32.saturating_sub(penalty)
}

/// Sections whose heading appears on a short line of its own, in `SECTIONS` order.
/// A heading line has no digits and opens with the section word.
fn detect_sections(text: &str) -> Vec<String> {
    let heading_words: Vec<String> = text
        .lines()
        .filter(|line| !line.chars().any(|c| c.is_ascii_digit()))
        .map(tokens)
        .filter(|t| !t.is_empty() && t.len() <= MAX_HEADING_TOKENS)
        .map(|mut t| t.swap_remove(0))
        .collect();

    SECTIONS
        .iter()
        .filter(|(_, markers, _)| {
            heading_words
                .iter()
                .any(|word| markers.contains(&word.as_str()))
        })
        .map(|(section, _, _)| section.to_string())
        .collect()
}

fn section_label(section: &str) -> &'static str {
    match section {
        "experience" => "Expérience professionnelle",
        "formation" => "Formation",
        "competences" => "Compétences",
        _ => "Langues",
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count()
}

/// Two or more lines split into cells by pipes or tabs.
fn has_table_layout(text: &str) -> bool {
    text.lines()
        .filter(|line| line.matches('|').count() >= 2 || line.matches('\t').count() >= 2)
        .count()
        >= 2
}

fn uppercase_ratio(text: &str) -> f32 {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() < MIN_LETTERS_FOR_CASE_CHECK {
        return 0.0;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    upper as f32 / letters.len() as f32
}

/// More than half of the bullet lines contain no figure.
fn mostly_unquantified(text: &str) -> bool {
    let bullets: Vec<&str> = text
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with(BULLET_MARKERS))
        .collect();
    if bullets.is_empty() {
        return false;
    }
    let unquantified = bullets
        .iter()
        .filter(|line| !line.chars().any(|c| c.is_ascii_digit()))
        .count();
    unquantified * 2 > bullets.len()
}
