//! Résumé feedback — short improvement suggestions plus a coarse fit verdict.
//!
//! `generate` never fails. Without a credential, on quota/auth errors, or on any other
//! failure it returns a deterministic fallback payload whose verdict says why.
//!
//! `AppState` holds an `Arc<dyn FeedbackGenerator>`.

pub mod prompts;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::feedback::prompts::{build_feedback_prompt, FEEDBACK_SYSTEM};
use crate::llm_client::{strip_json_fences, CallOptions, LlmClient, LlmError};

pub const MAX_SUGGESTIONS: usize = 3;

const FEEDBACK_OPTIONS: CallOptions = CallOptions {
    max_tokens: 250,
    temperature: Some(0.2),
};

const GENERIC_SUGGESTIONS: [&str; 3] = [
    "Make the skills section concise and relevant to the JD.",
    "Add 1-2 short projects showing tools from the JD.",
    "Mention quantifiable impact (e.g., improved X by Y%).",
];

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FitVerdict {
    StrongFit,
    PartialFit,
    WeakFit,
}

impl FitVerdict {
    /// Finds the earliest "strong fit" / "partial fit" / "weak fit" phrase in free text.
    /// A phrase directly negated ("not a strong fit") does not count.
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        [
            FitVerdict::StrongFit,
            FitVerdict::PartialFit,
            FitVerdict::WeakFit,
        ]
        .into_iter()
        .filter_map(|verdict| {
            let phrase = verdict.as_str().to_lowercase();
            lowered
                .match_indices(phrase.as_str())
                .map(|(at, _)| at)
                .find(|&at| !is_negated(&lowered[..at]))
                .map(|at| (at, verdict))
        })
        .min_by_key(|&(at, _)| at)
        .map(|(_, verdict)| verdict)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitVerdict::StrongFit => "Strong fit",
            FitVerdict::PartialFit => "Partial fit",
            FitVerdict::WeakFit => "Weak fit",
        }
    }
}

fn is_negated(preceding: &str) -> bool {
    let preceding = preceding.trim_end();
    ["not", "not a", "isn't a", "not really a"].iter().any(|negation| {
        preceding.strip_suffix(negation).is_some_and(|rest| {
            rest.is_empty() || rest.ends_with(|c: char| !c.is_alphanumeric())
        })
    })
}

/// Why the fallback payload was returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NoCredential,
    RateLimited,
    AuthFailure,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackVerdict {
    Assessed(FitVerdict),
    /// The model answered but the verdict line matched no known band.
    Unrecognized(String),
    Fallback(FallbackReason),
}

impl fmt::Display for FeedbackVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackVerdict::Assessed(v) => f.write_str(v.as_str()),
            FeedbackVerdict::Unrecognized(text) => f.write_str(text),
            FeedbackVerdict::Fallback(FallbackReason::NoCredential) => {
                f.write_str("LLM unavailable (fallback)")
            }
            FeedbackVerdict::Fallback(FallbackReason::RateLimited) => {
                f.write_str("LLM unavailable (quota/rate limit) - fallback suggestions")
            }
            FeedbackVerdict::Fallback(FallbackReason::AuthFailure) => {
                f.write_str("LLM auth error (invalid key)")
            }
            FeedbackVerdict::Fallback(FallbackReason::Other(_)) => {
                f.write_str("LLM error (fallback suggestions)")
            }
        }
    }
}

impl Serialize for FeedbackVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub suggestions: Vec<String>,
    pub verdict: FeedbackVerdict,
    /// True when the payload came from the fallback branch rather than the model.
    pub fallback: bool,
}

impl Feedback {
    /// Deterministic payload for when the model cannot be used.
    pub fn fallback(reason: FallbackReason, missing: &[String]) -> Self {
        let suggestions = match &reason {
            FallbackReason::NoCredential | FallbackReason::RateLimited => {
                skill_suggestions(missing)
            }
            FallbackReason::AuthFailure => vec![
                "API key invalid or revoked. Disable LLM feedback or set a valid key.".to_string(),
            ],
            FallbackReason::Other(error) => vec![
                format!("Could not fetch LLM suggestions: {error}"),
                "Add a small project line showing relevant skill(s).".to_string(),
            ],
        };
        Self {
            suggestions,
            verdict: FeedbackVerdict::Fallback(reason),
            fallback: true,
        }
    }
}

fn skill_suggestions(missing: &[String]) -> Vec<String> {
    let suggestions: Vec<String> = missing
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(|s| format!("Add a short project bullet demonstrating {s}."))
        .collect();
    if suggestions.is_empty() {
        GENERIC_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        suggestions
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn generate(&self, jd_text: &str, resume_text: &str, missing: &[String]) -> Feedback;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmFeedbackGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Feedback via Claude. `client` is `None` when no API key is configured.
pub struct LlmFeedbackGenerator {
    client: Option<LlmClient>,
}

impl LlmFeedbackGenerator {
    pub fn new(client: Option<LlmClient>) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl FeedbackGenerator for LlmFeedbackGenerator {
    async fn generate(&self, jd_text: &str, resume_text: &str, missing: &[String]) -> Feedback {
        let Some(client) = &self.client else {
            return Feedback::fallback(FallbackReason::NoCredential, missing);
        };

        let prompt = build_feedback_prompt(jd_text, resume_text, missing);
        match client.complete(&prompt, FEEDBACK_SYSTEM, FEEDBACK_OPTIONS).await {
            Ok(text) => parse_feedback(&text, missing),
            Err(e) => {
                warn!("Feedback generation fell back: {e}");
                Feedback::fallback(classify(&e), missing)
            }
        }
    }
}

fn classify(error: &LlmError) -> FallbackReason {
    if error.is_rate_limited() {
        FallbackReason::RateLimited
    } else if error.is_auth_failure() {
        FallbackReason::AuthFailure
    } else {
        FallbackReason::Other(error.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawFeedback {
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    verdict: String,
}

/// Parses model output: JSON (optionally fenced), then an embedded `{...}` object,
/// then one suggestion per line with the last line as the verdict.
fn parse_feedback(text: &str, missing: &[String]) -> Feedback {
    let raw = parse_json(strip_json_fences(text))
        .or_else(|| embedded_object(text).and_then(parse_json))
        .unwrap_or_else(|| parse_lines(text));

    let mut suggestions: Vec<String> = raw
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();
    if suggestions.is_empty() {
        suggestions = skill_suggestions(missing);
    }

    let verdict = match FitVerdict::parse(&raw.verdict) {
        Some(v) => FeedbackVerdict::Assessed(v),
        None if raw.verdict.trim().is_empty() => {
            FeedbackVerdict::Unrecognized("No verdict".to_string())
        }
        None => FeedbackVerdict::Unrecognized(raw.verdict.trim().to_string()),
    };

    Feedback {
        suggestions,
        verdict,
        fallback: false,
    }
}

fn parse_json(text: &str) -> Option<RawFeedback> {
    serde_json::from_str(text).ok()
}

fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_lines(text: &str) -> RawFeedback {
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.trim().trim_matches(|c: char| c == '-' || c == '•' || c == ' ').to_string())
        .filter(|l| !l.is_empty())
        .collect();
    RawFeedback {
        verdict: lines.last().cloned().unwrap_or_default(),
        suggestions: lines.into_iter().take(MAX_SUGGESTIONS).collect(),
    }
}
