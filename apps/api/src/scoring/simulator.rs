//! "What if" projection: how much a record's score would rise if the candidate
//! covered some of the missing skills.
//!
//! Each covered skill adds one JD skill's share of the hard score and a flat
//! [`SEMANTIC_BONUS_PER_SKILL`] to the semantic score, both capped at 100.

use serde::Serialize;

use crate::models::evaluation::EvaluationRecord;
use crate::scoring::fusion::{fuse, ScoringWeights, Verdict};

pub const SEMANTIC_BONUS_PER_SKILL: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// Selected skills that were actually missing; others are ignored.
    pub applied_skills: Vec<String>,
    pub hard_score: f64,
    pub semantic_score: f64,
    pub final_score: f64,
    pub verdict: Verdict,
    pub delta: f64,
}

pub fn project(
    record: &EvaluationRecord,
    selected: &[String],
    weights: ScoringWeights,
) -> Projection {
    let mut applied_skills: Vec<String> = Vec::new();
    for skill in selected {
        let skill = skill.trim().to_lowercase();
        let is_missing = record
            .missing_skills
            .iter()
            .any(|m| m.eq_ignore_ascii_case(&skill));
        if is_missing && !applied_skills.contains(&skill) {
            applied_skills.push(skill);
        }
    }

    let n = applied_skills.len() as f64;
    let jd_skill_count = (record.matched_skills.len() + record.missing_skills.len()).max(1);
    let per_skill_hard = 100.0 / jd_skill_count as f64;

    let hard_score = (record.hard_score + per_skill_hard * n).min(100.0);
    let semantic_score = (record.semantic_score + SEMANTIC_BONUS_PER_SKILL * n).min(100.0);
    let final_score = fuse(hard_score, semantic_score, weights);

    Projection {
        applied_skills,
        hard_score,
        semantic_score,
        final_score,
        verdict: Verdict::from_score(final_score),
        delta: crate::scoring::round2(final_score - record.final_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::sample_record;

    fn record() -> EvaluationRecord {
        let mut r = sample_record("cv.pdf", 45.0, 40.0);
        r.hard_score = 50.0;
        r.matched_skills = vec!["python".into(), "sql".into()];
        r.missing_skills = vec!["aws".into(), "docker".into()];
        r
    }

    #[test]
    fn test_projection_adds_per_skill_share() {
        let p = project(&record(), &["aws".to_string()], ScoringWeights::default());
        assert_eq!(p.applied_skills, vec!["aws"]);
        assert_eq!(p.hard_score, 75.0);
        assert_eq!(p.semantic_score, 43.0);
        assert_eq!(p.final_score, 59.0);
        assert_eq!(p.verdict, Verdict::Medium);
        assert_eq!(p.delta, 14.0);
    }

    #[test]
    fn test_projection_caps_at_100() {
        let mut r = record();
        r.semantic_score = 99.0;
        let p = project(
            &r,
            &["aws".to_string(), "docker".to_string()],
            ScoringWeights::default(),
        );
        assert_eq!(p.hard_score, 100.0);
        assert_eq!(p.semantic_score, 100.0);
        assert_eq!(p.verdict, Verdict::High);
    }

    #[test]
    fn test_projection_ignores_unknown_and_duplicate_skills() {
        let p = project(
            &record(),
            &["AWS".to_string(), "aws".to_string(), "cobol".to_string()],
            ScoringWeights::default(),
        );
        assert_eq!(p.applied_skills, vec!["aws"]);
    }

    #[test]
    fn test_projection_with_nothing_selected_keeps_scores() {
        let r = record();
        let p = project(&r, &[], ScoringWeights::default());
        assert_eq!(p.hard_score, r.hard_score);
        assert_eq!(p.semantic_score, r.semantic_score);
        assert_eq!(p.final_score, 45.0);
        assert_eq!(p.delta, 0.0);
    }
}
