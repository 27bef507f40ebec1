use tracing::debug;

use crate::constants::SAME_PERSON_THRESHOLD;
use crate::similarity::PairwiseScores;

use super::types::{SimilarityAnalysis, VerificationResult, Verdict};

#[derive(Debug, Clone, Copy)]
pub struct IdentityDecider {
    threshold: f32,
}

impl Default for IdentityDecider {
    fn default() -> Self {
        Self::new(SAME_PERSON_THRESHOLD)
    }
}

impl IdentityDecider {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn decide(&self, scores: &PairwiseScores) -> Verdict {
        let values = scores.values();
        let n = values.len() as f32;

        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

        let all_pairs_pass = min >= self.threshold;

        let (result, confidence) = if all_pairs_pass {
            (VerificationResult::SamePerson, mean)
        } else {
            (VerificationResult::DifferentPerson, 1.0 - mean)
        };

        debug!(
            min = min,
            mean = mean,
            threshold = self.threshold,
            result = %result,
            "Identity decision"
        );

        Verdict {
            result,
            confidence,
            analysis: SimilarityAnalysis {
                min_similarity: min,
                max_similarity: max,
                avg_similarity: mean,
                std_similarity: variance.sqrt(),
                threshold_used: self.threshold,
                all_pairs_pass,
            },
        }
    }
}
