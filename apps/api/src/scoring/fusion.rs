//! Score fusion and verdict banding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::round2;

/// Lower bound of the High band.
pub const HIGH_THRESHOLD: f64 = 75.0;
/// Lower bound of the Medium band.
pub const MEDIUM_THRESHOLD: f64 = 50.0;

/// Weights applied to the hard and semantic scores. Expected, not enforced, to sum to 1.0;
/// when they do and both inputs are in [0, 100] the fused score is too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub hard: f64,
    pub semantic: f64,
}

impl ScoringWeights {
    pub fn new(hard: f64, semantic: f64) -> Self {
        Self { hard, semantic }
    }

    /// Semantic weight is the complement of `hard`, rounded to 2 decimals.
    pub fn from_hard_weight(hard: f64) -> Self {
        Self {
            hard,
            semantic: round2(1.0 - hard),
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::from_hard_weight(0.5)
    }
}

/// `round(hard × w_hard + semantic × w_semantic, 2)`
pub fn fuse(hard_score: f64, semantic_score: f64, weights: ScoringWeights) -> f64 {
    round2(hard_score * weights.hard + semantic_score * weights.semantic)
}

/// Coarse banding of a final score. Each band includes its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Medium,
    Low,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            Verdict::High
        } else if score >= MEDIUM_THRESHOLD {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::High => "High",
            Verdict::Medium => "Medium",
            Verdict::Low => "Low",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuse_equal_weights() {
        assert_eq!(fuse(100.0, 50.0, ScoringWeights::default()), 75.0);
    }

    #[test]
    fn test_fuse_rounds_to_two_decimals() {
        // 66.67*0.3 + 41.23*0.7 = 20.001 + 28.861 = 48.862
        assert_eq!(fuse(66.67, 41.23, ScoringWeights::new(0.3, 0.7)), 48.86);
    }

    #[test]
    fn test_fuse_bounded_when_weights_sum_to_one() {
        for hw in [0.0, 0.25, 0.5, 0.8, 1.0] {
            let w = ScoringWeights::from_hard_weight(hw);
            let top = fuse(100.0, 100.0, w);
            let bottom = fuse(0.0, 0.0, w);
            assert!((0.0..=100.0).contains(&top), "top={top} for {w:?}");
            assert_eq!(bottom, 0.0);
        }
    }

    #[test]
    fn test_fuse_monotonic_in_each_input() {
        let w = ScoringWeights::from_hard_weight(0.4);
        let grid = [0.0, 12.5, 33.33, 50.0, 80.0, 100.0];
        for pair in grid.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            for fixed in grid {
                assert!(fuse(lo, fixed, w) <= fuse(hi, fixed, w));
                assert!(fuse(fixed, lo, w) <= fuse(fixed, hi, w));
            }
        }
    }

    #[test]
    fn test_from_hard_weight_complement() {
        let w = ScoringWeights::from_hard_weight(0.7);
        assert_eq!(w.semantic, 0.3);
    }

    #[test]
    fn test_verdict_band_boundaries() {
        assert_eq!(Verdict::from_score(75.0), Verdict::High);
        assert_eq!(Verdict::from_score(74.99), Verdict::Medium);
        assert_eq!(Verdict::from_score(50.0), Verdict::Medium);
        assert_eq!(Verdict::from_score(49.99), Verdict::Low);
        assert_eq!(Verdict::from_score(0.0), Verdict::Low);
        assert_eq!(Verdict::from_score(100.0), Verdict::High);
    }

    #[test]
    fn test_verdict_display_and_serde() {
        assert_eq!(Verdict::Medium.to_string(), "Medium");
        assert_eq!(serde_json::to_string(&Verdict::High).unwrap(), "\"High\"");
    }
}
