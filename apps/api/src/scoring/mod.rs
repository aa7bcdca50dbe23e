// Scoring engine: text cleanup, vocabulary-driven skill detection, hard (lexical/fuzzy)
// matching, embedding similarity, score fusion and per-résumé evaluation.
// Everything here is synchronous. Embedding calls are CPU-bound and must run inside
// tokio::task::spawn_blocking when driven from a handler.

pub mod fusion;
pub mod hard_match;
pub mod normalizer;
pub mod orchestrator;
pub mod sections;
pub mod semantic;
pub mod simulator;
pub mod vocabulary;

pub use fusion::{fuse, ScoringWeights, Verdict};
pub use orchestrator::Evaluator;
pub use semantic::SemanticScorer;
pub use vocabulary::SkillVocabulary;

/// Rounds to 2 decimals, half away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(0.0), 0.0);
    }
}
