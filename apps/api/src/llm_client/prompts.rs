// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every extraction and rewriting prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only use information explicitly present in the source text. \
    Do NOT infer, interpolate, or invent employers, dates, diplomas, skills or figures. \
    When a field is absent from the source, use null or an empty array.";

/// The product targets French-speaking recruiters and candidates.
pub const FRENCH_OUTPUT_INSTRUCTION: &str = "\
    Free-text values (summaries, descriptions, recommendations, rewritten text) \
    MUST be written in French. Keep proper nouns, product names and technology names \
    in their original spelling.";
