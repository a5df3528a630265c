//! Text normalization shared by extraction, matching and the ATS audit.
//!
//! French résumés mix accented and unaccented spellings ("expérience" /
//! "experience") and tools like "C++" or "C#" that naive splitting destroys.
//! Everything here folds accents, lower-cases, and splits on anything that is
//! not alphanumeric, `+` or `#`.

use std::collections::{HashMap, HashSet};

/// French and English function words ignored by overlap measures.
const STOPWORDS: &[&str] = &[
    // French
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "est",
    "il", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "mes", "moi", "mon",
    "ne", "nos", "notre", "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa",
    "se", "ses", "son", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos",
    "votre", "vous", "cette", "afin", "ainsi", "chez", "entre", "plus", "sein", "tout", "tous",
    "toutes", "etre", "avoir", "sont", "ont",
    // English
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of",
    "on", "or", "the", "to", "with", "we", "you", "our", "your", "will",
];

/// Maps a single character to its unaccented lower-case form.
fn fold_char(c: char, out: &mut String) {
    match c {
        'à' | 'â' | 'ä' | 'á' | 'ã' | 'À' | 'Â' | 'Ä' | 'Á' => out.push('a'),
        'ç' | 'Ç' => out.push('c'),
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => out.push('e'),
        'î' | 'ï' | 'í' | 'Î' | 'Ï' => out.push('i'),
        'ô' | 'ö' | 'ó' | 'õ' | 'Ô' | 'Ö' => out.push('o'),
        'ù' | 'û' | 'ü' | 'ú' | 'Ù' | 'Û' | 'Ü' => out.push('u'),
        'ÿ' | 'Ÿ' => out.push('y'),
        'ñ' | 'Ñ' => out.push('n'),
        'œ' | 'Œ' => out.push_str("oe"),
        'æ' | 'Æ' => out.push_str("ae"),
        c if c.is_alphanumeric() || c == '+' || c == '#' => out.extend(c.to_lowercase()),
        _ => out.push(' '),
    }
}

/// Lower-cased, accent-folded text with separators collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        fold_char(c, &mut folded);
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every normalized token, in order. Used for phrase matching.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens that carry meaning: no stopwords, no single characters.
pub fn content_tokens(text: &str) -> Vec<String> {
    tokens(text)
        .into_iter()
        .filter(|t| t.chars().count() > 1 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

pub fn content_token_set(text: &str) -> HashSet<String> {
    content_tokens(text).into_iter().collect()
}

/// True when `phrase` appears in `haystack` as a contiguous token sequence.
pub fn contains_phrase(haystack: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > haystack.len() {
        return false;
    }
    haystack.windows(phrase.len()).any(|w| w == phrase)
}

/// Cosine similarity of the content-token frequency vectors of two texts.
pub fn term_frequency_cosine(a: &str, b: &str) -> f32 {
    let tf_a = term_frequencies(a);
    let tf_b = term_frequencies(b);
    if tf_a.is_empty() || tf_b.is_empty() {
        return 0.0;
    }

    let dot: f32 = tf_a
        .iter()
        .filter_map(|(term, &ca)| tf_b.get(term).map(|&cb| ca * cb))
        .sum();
    let norm_a: f32 = tf_a.values().map(|c| c * c).sum::<f32>().sqrt();
    let norm_b: f32 = tf_b.values().map(|c| c * c).sum::<f32>().sqrt();

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

fn term_frequencies(text: &str) -> HashMap<String, f32> {
    let mut tf = HashMap::new();
    for token in content_tokens(text) {
        *tf.entry(token).or_insert(0.0) += 1.0;
    }
    tf
}
