use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::embedding::ModelChoice;
use crate::extraction::FormatSupport;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values; nothing is strictly required.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent → feedback always uses its fallback payload.
    pub anthropic_api_key: Option<String>,
    pub default_hard_weight: f64,
    pub embedding_model: ModelChoice,
    pub skill_vocabulary_path: Option<PathBuf>,
    pub formats: FormatSupport,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_hard_weight: f64 = parse_or(&lookup, "DEFAULT_HARD_WEIGHT", 0.5)?;
        if !(0.0..=1.0).contains(&default_hard_weight) {
            anyhow::bail!("DEFAULT_HARD_WEIGHT must be between 0.0 and 1.0, got {default_hard_weight}");
        }

        let embedding_model = match lookup("EMBEDDING_MODEL") {
            Some(name) => name
                .parse::<ModelChoice>()
                .map_err(anyhow::Error::msg)
                .context("EMBEDDING_MODEL is not a supported model")?,
            None => ModelChoice::default(),
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            default_hard_weight,
            embedding_model,
            skill_vocabulary_path: lookup("SKILL_VOCABULARY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            formats: FormatSupport {
                pdf: parse_or(&lookup, "ENABLE_PDF_EXTRACTION", true)?,
                docx: parse_or(&lookup, "ENABLE_DOCX_EXTRACTION", true)?,
            },
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.rust_log, "info");
        assert!(c.anthropic_api_key.is_none());
        assert_eq!(c.default_hard_weight, 0.5);
        assert_eq!(c.embedding_model, ModelChoice::AllMiniLmL6V2);
        assert!(c.skill_vocabulary_path.is_none());
        assert_eq!(c.formats, FormatSupport::default());
        assert_eq!(c.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("PORT", "9000"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("DEFAULT_HARD_WEIGHT", "0.7"),
            ("EMBEDDING_MODEL", "bge-small-en-v1.5"),
            ("SKILL_VOCABULARY_PATH", "/etc/skills.txt"),
            ("ENABLE_PDF_EXTRACTION", "false"),
        ])
        .unwrap();
        assert_eq!(c.port, 9000);
        assert_eq!(c.anthropic_api_key.as_deref(), Some("sk-test"));
        assert_eq!(c.default_hard_weight, 0.7);
        assert_eq!(c.embedding_model, ModelChoice::BgeSmallEnV15);
        assert_eq!(c.skill_vocabulary_path, Some(PathBuf::from("/etc/skills.txt")));
        assert!(!c.formats.pdf);
        assert!(c.formats.docx);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let c = config(&[("ANTHROPIC_API_KEY", "  ")]).unwrap();
        assert!(c.anthropic_api_key.is_none());
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("DEFAULT_HARD_WEIGHT", "1.5")]).is_err());
        assert!(config(&[("EMBEDDING_MODEL", "word2vec")]).is_err());
        assert!(config(&[("ENABLE_DOCX_EXTRACTION", "maybe")]).is_err());
    }
}
