//! Hard (lexical) matching of JD skills against résumé skills.
//!
//! Algorithm, per JD skill:
//! 1. exact membership in the résumé skill set → matched
//! 2. otherwise a token-sort similarity against every résumé skill; any ratio ≥ 80 → matched
//! 3. otherwise → missing
//!
//! hard_score = 100 × |matched| / |jd_skills|, rounded to 2 decimals. An empty JD skill set
//! scores 0.0 with empty matched/missing lists.

use serde::{Deserialize, Serialize};

use crate::scoring::round2;
use crate::scoring::vocabulary::SkillSet;

/// Minimum token-sort ratio (0–100) for a fuzzy match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 80.0;

/// Outcome of matching one JD skill set against one résumé skill set.
/// `matched` and `missing` partition the JD skills and keep their sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub hard_score: f64,
}

/// Token-order-insensitive similarity on a 0–100 scale.
///
/// Both inputs are lower-cased, split on whitespace, the tokens sorted and re-joined,
/// then compared with the Indel ratio `200 × LCS / (|a| + |b|)` over chars. Two empty
/// strings score 100. Symmetric by construction.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = sort_tokens(a).chars().collect();
    let b: Vec<char> = sort_tokens(b).chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(&a, &b) as f64 / total as f64
}

/// Length of the longest common subsequence, one DP row at a time.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

fn sort_tokens(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Matches JD skills against résumé skills.
pub fn match_skills(jd_skills: &SkillSet, resume_skills: &SkillSet) -> MatchResult {
    if jd_skills.is_empty() {
        return MatchResult::default();
    }

    let (matched, missing): (Vec<String>, Vec<String>) = jd_skills
        .iter()
        .cloned()
        .partition(|skill| is_covered(skill, resume_skills));

    let hard_score = round2(matched.len() as f64 / jd_skills.len() as f64 * 100.0);

    MatchResult {
        matched,
        missing,
        hard_score,
    }
}

fn is_covered(skill: &str, resume_skills: &SkillSet) -> bool {
    resume_skills.contains(skill)
        || resume_skills
            .iter()
            .any(|candidate| token_sort_ratio(skill, candidate) >= FUZZY_MATCH_THRESHOLD)
}
