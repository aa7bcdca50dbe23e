//! Batch runner: extract each uploaded résumé, score it against every registered JD,
//! keep its best record, rank the lot.
//!
//! A file that fails extraction is reported in `failures` and skipped; it never
//! aborts the rest of the batch.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::analytics::rank;
use crate::extraction::DocumentExtractor;
use crate::models::document::JobDescription;
use crate::models::evaluation::EvaluationRecord;
use crate::scoring::{Evaluator, ScoringWeights, SkillVocabulary};

/// One uploaded file, as received from multipart.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Best record per résumé, ranked by `final_score` descending.
    pub records: Vec<EvaluationRecord>,
    pub failures: Vec<FileFailure>,
}

pub fn run_batch(
    evaluator: &Evaluator,
    extractor: &DocumentExtractor,
    uploads: &[Upload],
    jds: &[JobDescription],
    weights: ScoringWeights,
    vocabulary: Option<&SkillVocabulary>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for upload in uploads {
        let text = match extractor.extract(&upload.file_name, &upload.bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: {e}", upload.file_name);
                outcome.failures.push(FileFailure {
                    file_name: upload.file_name.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        if let Some(best) =
            evaluator.evaluate_best(&upload.file_name, &text, jds, weights, vocabulary)
        {
            outcome.records.push(best);
        }
    }

    rank(&mut outcome.records);
    info!(
        "Batch scored {} résumé(s) against {} JD(s), {} failed",
        outcome.records.len(),
        jds.len(),
        outcome.failures.len()
    );
    outcome
}
