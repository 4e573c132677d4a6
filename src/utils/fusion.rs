// Score fusion
// Blends the heuristic score with an optional classifier probability

use serde::{Deserialize, Serialize};

use crate::models::Advice;

/// Relative weights of the heuristic score and the classifier score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub heuristic: f64,
    pub model: f64,
}

pub const DEFAULT_FUSION_WEIGHTS: FusionWeights = FusionWeights {
    heuristic: 0.6,
    model: 0.4,
};

impl Default for FusionWeights {
    fn default() -> Self {
        DEFAULT_FUSION_WEIGHTS
    }
}

impl FusionWeights {
    /// Final score for `heuristic` (0..=100) and an optional probability (0..=1).
    /// Without a probability the heuristic score is returned as is.
    pub fn fuse(&self, heuristic: u8, probability: Option<f64>) -> u8 {
        let Some(probability) = probability else {
            return heuristic;
        };

        // Half-to-even, matching the scores produced by the trained pipeline
        let ml_score = (probability * 100.0).round_ties_even();
        let combined = (self.heuristic * f64::from(heuristic) + self.model * ml_score)
            .round_ties_even();

        if combined.is_nan() {
            return heuristic;
        }
        combined.clamp(0.0, 100.0) as u8
    }
}

/// `fuse` with the default 0.6 / 0.4 weighting
pub fn fuse(heuristic: u8, probability: Option<f64>) -> u8 {
    DEFAULT_FUSION_WEIGHTS.fuse(heuristic, probability)
}

/// Fused score and its advice tier
pub fn fuse_with_advice(
    weights: &FusionWeights,
    heuristic: u8,
    probability: Option<f64>,
) -> (u8, Advice) {
    let final_score = weights.fuse(heuristic, probability);
    (final_score, Advice::from_score(final_score))
}
