use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::document::{JobDescription, JobDescriptionSummary};
use crate::models::evaluation::EvaluationRecord;
use crate::scoring::ScoringWeights;

/// Default name for a JD pasted as text rather than uploaded.
pub const PASTED_JD_NAME: &str = "pasted_JD";

/// Metadata of the last completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub weights: ScoringWeights,
    pub resumes_scored: usize,
    pub resumes_failed: usize,
    pub jd_count: usize,
}

/// A run scored against a JD list that was cleared before its results were stored.
#[derive(Debug, Error)]
#[error("job descriptions changed while run {run_id} was scoring; re-run the evaluation")]
pub struct StaleRun {
    pub run_id: Uuid,
}

/// Single-session state: registered JDs and the ranked best records of the last run.
///
/// `jd_generation` changes whenever existing JD indexes are invalidated, so a run can
/// tell whether the indexes in its records still point at the JDs it scored.
#[derive(Debug, Default)]
pub struct Session {
    jds: Vec<JobDescription>,
    jd_generation: u64,
    results: Vec<EvaluationRecord>,
    last_run: Option<RunSummary>,
}

impl Session {
    /// Registers a JD and returns its index.
    pub fn add_jd(&mut self, name: impl Into<String>, text: impl Into<String>) -> usize {
        let index = self.jds.len();
        self.jds.push(JobDescription::new(index, name, text));
        index
    }

    pub fn jds(&self) -> &[JobDescription] {
        &self.jds
    }

    pub fn jd(&self, index: usize) -> Option<&JobDescription> {
        self.jds.get(index)
    }

    pub fn jd_summaries(&self) -> Vec<JobDescriptionSummary> {
        self.jds.iter().map(JobDescription::summary).collect()
    }

    pub fn jd_generation(&self) -> u64 {
        self.jd_generation
    }

    /// Drops all JDs. Results are cleared too since their `jd_index` would dangle.
    pub fn clear_jds(&mut self) {
        self.jds.clear();
        self.jd_generation = self.jd_generation.wrapping_add(1);
        self.results.clear();
        self.last_run = None;
    }

    /// Replaces the previous run's results. `results` must already be ranked.
    ///
    /// `jd_generation` is the value read when the run snapshotted the JDs; if the JDs
    /// were cleared since, the results are rejected and the session is left unchanged.
    pub fn store_run(
        &mut self,
        jd_generation: u64,
        summary: RunSummary,
        results: Vec<EvaluationRecord>,
    ) -> Result<(), StaleRun> {
        if jd_generation != self.jd_generation {
            return Err(StaleRun {
                run_id: summary.run_id,
            });
        }
        self.results = results;
        self.last_run = Some(summary);
        Ok(())
    }

    pub fn results(&self) -> &[EvaluationRecord] {
        &self.results
    }

    pub fn result(&self, index: usize) -> Option<&EvaluationRecord> {
        self.results.get(index)
    }

    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::sample_record;

    fn summary() -> RunSummary {
        RunSummary {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            weights: ScoringWeights::default(),
            resumes_scored: 1,
            resumes_failed: 0,
            jd_count: 1,
        }
    }

    #[test]
    fn test_add_jd_assigns_sequential_indexes() {
        let mut session = Session::default();
        assert_eq!(session.add_jd(PASTED_JD_NAME, "Python"), 0);
        assert_eq!(session.add_jd("backend.pdf", "Rust"), 1);
        assert_eq!(session.jd(1).unwrap().name(), "backend.pdf");
        assert_eq!(session.jd_summaries().len(), 2);
    }

    #[test]
    fn test_store_run_replaces_results() {
        let mut session = Session::default();
        session
            .store_run(0, summary(), vec![sample_record("a", 10.0, 5.0)])
            .unwrap();
        session
            .store_run(0, summary(), vec![sample_record("b", 20.0, 5.0)])
            .unwrap();
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.result(0).unwrap().filename, "b");
        assert!(session.last_run().is_some());
    }

    #[test]
    fn test_clear_jds_clears_results() {
        let mut session = Session::default();
        session.add_jd("jd", "Python");
        let generation = session.jd_generation();
        session
            .store_run(generation, summary(), vec![sample_record("a", 10.0, 5.0)])
            .unwrap();
        session.clear_jds();
        assert!(session.jds().is_empty());
        assert!(session.results().is_empty());
        assert!(session.last_run().is_none());
    }

    #[test]
    fn test_run_against_cleared_jds_is_rejected() {
        let mut session = Session::default();
        session.add_jd("data", "Python and SQL");
        let generation = session.jd_generation();
        let jds = session.jds().to_vec();

        // JDs replaced while the run scores its snapshot
        session.clear_jds();
        session.add_jd("web", "React");

        let mut record = sample_record("a", 10.0, 5.0);
        record.jd_name = jds[0].name().to_string();
        let run = summary();
        let run_id = run.run_id;
        let err = session.store_run(generation, run, vec![record]).unwrap_err();
        assert_eq!(err.run_id, run_id);
        assert!(session.results().is_empty());
        assert!(session.last_run().is_none());
        assert_eq!(session.jd(0).unwrap().name(), "web");
    }

    #[test]
    fn test_adding_jds_keeps_generation() {
        let mut session = Session::default();
        let generation = session.jd_generation();
        session.add_jd("a", "Python");
        assert_eq!(session.jd_generation(), generation);
        assert!(session
            .store_run(generation, summary(), vec![sample_record("a", 10.0, 5.0)])
            .is_ok());
    }
}
