//! Semantic similarity: whole-document embedding cosine similarity on a 0–100 scale.
//!
//! Failure never aborts an evaluation. Any embedding or numeric failure yields
//! [`SemanticOutcome::Degraded`], whose score is 0.0.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::embedding::Embedder;
use crate::scoring::round2;

/// Added to the norm product so near-zero vectors give 0 instead of NaN.
pub const NORM_EPSILON: f64 = 1e-10;

/// Result of one semantic comparison. The degraded branch carries the reason so
/// callers can log it; its score is always 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SemanticOutcome {
    Scored { score: f64 },
    Degraded { reason: String },
}

impl SemanticOutcome {
    pub fn score(&self) -> f64 {
        match self {
            SemanticOutcome::Scored { score } => *score,
            SemanticOutcome::Degraded { .. } => 0.0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SemanticOutcome::Degraded { .. })
    }
}

/// Cosine similarity clamped to [0, 1].
///
/// Returns `None` on a dimension mismatch or a non-finite result.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (x as f64, y as f64);
            (dot + x * y, na + x * x, nb + y * y)
        },
    );
    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt() + NORM_EPSILON);
    similarity.is_finite().then(|| similarity.clamp(0.0, 1.0))
}

/// Scores JD/résumé pairs with an injected [`Embedder`].
#[derive(Clone)]
pub struct SemanticScorer {
    embedder: Arc<dyn Embedder>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn score(&self, jd_text: &str, resume_text: &str) -> SemanticOutcome {
        let outcome = self.try_score(jd_text, resume_text);
        if let SemanticOutcome::Degraded { reason } = &outcome {
            warn!("Semantic scoring degraded to 0.0: {reason}");
        }
        outcome
    }

    fn try_score(&self, jd_text: &str, resume_text: &str) -> SemanticOutcome {
        let jd_vector = match self.embedder.embed(jd_text) {
            Ok(v) => v,
            Err(e) => return degraded(format!("JD embedding failed: {e}")),
        };
        let resume_vector = match self.embedder.embed(resume_text) {
            Ok(v) => v,
            Err(e) => return degraded(format!("résumé embedding failed: {e}")),
        };

        match cosine_similarity(&jd_vector, &resume_vector) {
            Some(similarity) => SemanticOutcome::Scored {
                score: round2(similarity * 100.0),
            },
            None => degraded(format!(
                "invalid similarity for vectors of {} and {} dims",
                jd_vector.len(),
                resume_vector.len()
            )),
        }
    }
}

fn degraded(reason: String) -> SemanticOutcome {
    SemanticOutcome::Degraded { reason }
}

/// In-process embedders for tests. No model download involved.
#[cfg(test)]
pub mod testing {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use crate::embedding::{Embedder, EmbeddingError};

    const DIMS: usize = 256;

    /// Hashed bag-of-words vectors: deterministic, and texts sharing words score higher.
    pub struct BagOfWordsEmbedder;

    impl Embedder for BagOfWordsEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let mut vector = vec![0.0_f32; DIMS];
            let lowered = text.to_lowercase();
            for token in lowered
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
            {
                let mut hasher = DefaultHasher::new();
                token.hash(&mut hasher);
                vector[(hasher.finish() as usize) % DIMS] += 1.0;
            }
            Ok(vector)
        }
    }

    /// Always fails, as if the model could not be loaded.
    pub struct UnavailableEmbedder;

    impl Embedder for UnavailableEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::ModelUnavailable("offline".to_string()))
        }
    }

    /// Returns vectors whose length depends on the text, to exercise dimension checks.
    pub struct RaggedEmbedder;

    impl Embedder for RaggedEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![1.0; text.len().max(1)])
        }
    }
}
