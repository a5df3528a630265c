use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a numeric one is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Embedding-based scorer when true, pure lexical scorer otherwise.
    pub enable_semantic_scoring: bool,
    pub optimization_max_iterations: u32,
    pub optimization_target_score: u32,
    pub embedding_cache_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            chat_model: env_or("OPENAI_CHAT_MODEL", "gpt-4o-mini"),
            embedding_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            enable_semantic_scoring: parse_env("ENABLE_SEMANTIC_SCORING", true)?,
            optimization_max_iterations: parse_env("OPTIMIZATION_MAX_ITERATIONS", 3)?,
            optimization_target_score: parse_env("OPTIMIZATION_TARGET_SCORE", 80)?,
            embedding_cache_capacity: parse_env("EMBEDDING_CACHE_CAPACITY", 512)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("CVMATCH_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("CVMATCH_TEST_BAD_NUMBER", "eighty");
        let result: Result<u32> = parse_env("CVMATCH_TEST_BAD_NUMBER", 80);
        assert!(result.is_err());
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("CVMATCH_TEST_BAD_NUMBER"));
    }

    #[test]
    fn test_parse_env_bool() {
        std::env::set_var("CVMATCH_TEST_FLAG", "false");
        let flag: bool = parse_env("CVMATCH_TEST_FLAG", true).unwrap();
        assert!(!flag);
    }
}
