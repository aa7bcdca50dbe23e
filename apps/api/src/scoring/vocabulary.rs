//! Skill vocabulary and vocabulary-driven skill detection.
//!
//! Detection is plain case-insensitive substring containment, not whole-word matching:
//! "java" is found inside "javascript" and "sql" inside "mysql". Callers that need
//! stricter behaviour must post-filter.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::scoring::normalizer::clean_text;

/// Skills detected in one document: lower-cased, sorted, deduplicated.
pub type SkillSet = BTreeSet<String>;

/// Built-in vocabulary of common technical terms. "sql" is listed twice;
/// [`SkillVocabulary::new`] drops the duplicate.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "sql",
    "machine learning",
    "deep learning",
    "tensorflow",
    "pytorch",
    "nlp",
    "computer vision",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "linux",
    "matlab",
    "opencv",
    "react",
    "node.js",
    "html",
    "css",
    "javascript",
    "excel",
    "sql",
    "pandas",
    "numpy",
    "scikit-learn",
    "tableau",
    "power bi",
    "spark",
];

/// Ordered set of canonical skill strings, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    entries: Vec<String>,
}

impl SkillVocabulary {
    /// Builds a vocabulary, lower-casing and trimming every entry. Duplicates (after
    /// normalization) and blank entries are dropped; first occurrence keeps its position.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut normalized = Vec::new();
        for entry in entries {
            let skill = entry.as_ref().trim().to_lowercase();
            // An empty needle would match every document.
            if skill.is_empty() {
                continue;
            }
            if seen.insert(skill.clone()) {
                normalized.push(skill);
            }
        }
        Self {
            entries: normalized,
        }
    }

    /// Parses a comma-separated list, e.g. a per-request override `"rust, go, sql"`.
    pub fn from_comma_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Parses a newline-separated list. `#` starts a comment line.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Loads a newline-separated vocabulary file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill vocabulary '{}'", path.display()))?;
        let vocabulary = Self::from_lines(&text);
        if vocabulary.is_empty() {
            anyhow::bail!(
                "Skill vocabulary '{}' contains no entries",
                path.display()
            );
        }
        Ok(vocabulary)
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the vocabulary skills present in `text`.
    pub fn extract(&self, text: &str) -> SkillSet {
        let haystack = clean_text(text).to_lowercase();
        self.entries
            .iter()
            .filter(|skill| haystack.contains(skill.as_str()))
            .cloned()
            .collect()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied())
    }
}
