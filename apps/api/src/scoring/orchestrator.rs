//! Evaluation orchestration.
//!
//! Per (résumé, JD) pair: clean → extract skills ×2 → hard match → semantic score →
//! fuse → verdict → [`EvaluationRecord`]. Across several JDs only the best record per
//! résumé is kept: highest `final_score`, ties broken by highest `semantic_score`,
//! full ties resolved in favour of the earlier JD.

use std::sync::Arc;

use tracing::debug;

use crate::models::document::{Document, JobDescription};
use crate::models::evaluation::EvaluationRecord;
use crate::scoring::fusion::{fuse, ScoringWeights, Verdict};
use crate::scoring::hard_match::match_skills;
use crate::scoring::semantic::SemanticScorer;
use crate::scoring::vocabulary::SkillVocabulary;

/// Runs the scoring pipeline. Holds the read-only default vocabulary and the semantic scorer.
#[derive(Clone)]
pub struct Evaluator {
    vocabulary: Arc<SkillVocabulary>,
    semantic: SemanticScorer,
}

impl Evaluator {
    pub fn new(vocabulary: Arc<SkillVocabulary>, semantic: SemanticScorer) -> Self {
        Self {
            vocabulary,
            semantic,
        }
    }

    /// Scores one résumé against one JD. An absent or empty `vocabulary` override falls
    /// back to the default vocabulary.
    pub fn evaluate(
        &self,
        filename: &str,
        resume_text: &str,
        jd: &JobDescription,
        weights: ScoringWeights,
        vocabulary: Option<&SkillVocabulary>,
    ) -> EvaluationRecord {
        let resume = Document::new(filename, resume_text);
        self.evaluate_document(&resume, jd, weights, vocabulary)
    }

    fn evaluate_document(
        &self,
        resume: &Document,
        jd: &JobDescription,
        weights: ScoringWeights,
        vocabulary: Option<&SkillVocabulary>,
    ) -> EvaluationRecord {
        let vocabulary = vocabulary
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.vocabulary);

        let jd_text = jd.document.clean_text();
        let resume_text = resume.clean_text();

        let jd_skills = vocabulary.extract(jd_text);
        let resume_skills = vocabulary.extract(resume_text);
        let hard = match_skills(&jd_skills, &resume_skills);

        let semantic_score = self.semantic.score(jd_text, resume_text).score();
        let final_score = fuse(hard.hard_score, semantic_score, weights);
        let verdict = Verdict::from_score(final_score);

        debug!(
            "{} vs JD {} ({}): hard={} semantic={} final={} verdict={}",
            resume.name(),
            jd.index,
            jd.name(),
            hard.hard_score,
            semantic_score,
            final_score,
            verdict
        );

        EvaluationRecord {
            filename: resume.name().to_string(),
            jd_index: jd.index,
            jd_name: jd.name().to_string(),
            hard_score: hard.hard_score,
            semantic_score,
            final_score,
            verdict,
            matched_skills: hard.matched,
            missing_skills: hard.missing,
            resume_text: resume_text.to_string(),
        }
    }

    /// Scores a résumé against every JD and keeps the best record.
    /// Returns `None` only when `jds` is empty.
    pub fn evaluate_best(
        &self,
        filename: &str,
        resume_text: &str,
        jds: &[JobDescription],
        weights: ScoringWeights,
        vocabulary: Option<&SkillVocabulary>,
    ) -> Option<EvaluationRecord> {
        let resume = Document::new(filename, resume_text);
        select_best(
            jds.iter()
                .map(|jd| self.evaluate_document(&resume, jd, weights, vocabulary)),
        )
    }
}

/// Picks the record with the highest `final_score`, then highest `semantic_score`.
/// On a full tie the first record wins.
pub fn select_best<I>(records: I) -> Option<EvaluationRecord>
where
    I: IntoIterator<Item = EvaluationRecord>,
{
    records.into_iter().fold(None, |best, candidate| match best {
        Some(current) if !outranks(&candidate, &current) => Some(current),
        _ => Some(candidate),
    })
}

fn outranks(candidate: &EvaluationRecord, current: &EvaluationRecord) -> bool {
    candidate
        .final_score
        .total_cmp(&current.final_score)
        .then(candidate.semantic_score.total_cmp(&current.semantic_score))
        .is_gt()
}
