//! Pairwise cosine similarity over the three embeddings of a verification call.
//!
//! # Clipping
//!
//! Raw cosine similarity lies in `[-1, 1]`. The decision layer only cares about
//! "how alike", so [`clipped_similarity`] maps every negative value to `0.0`: two
//! antiparallel faces score `0.0`, not `-1.0`. This is not a cosine *distance*;
//! do not feed these scores into code expecting one.


use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::IMAGES_PER_VERIFICATION;
use crate::embedding::NormalizedEmbedding;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimilarityError {
    #[error("expected {expected} embeddings, got {actual}")]
    WrongCount { expected: usize, actual: usize },
}

/// Similarity of every unordered image pair, each clipped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseScores {
    pub img1_img2: f32,
    pub img1_img3: f32,
    pub img2_img3: f32,
}

impl PairwiseScores {
    pub fn new(img1_img2: f32, img1_img3: f32, img2_img3: f32) -> Self {
        Self {
            img1_img2,
            img1_img3,
            img2_img3,
        }
    }

    /// Scores in pair order `(1,2)`, `(1,3)`, `(2,3)`.
    pub fn values(&self) -> [f32; 3] {
        [self.img1_img2, self.img1_img3, self.img2_img3]
    }

    pub fn to_percentages(&self) -> [f32; 3] {
        self.values().map(|s| s * 100.0)
    }
}

/// Raw cosine similarity; `0.0` for empty, mismatched or zero-norm inputs.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Cosine similarity clipped to `[0, 1]`.
#[inline]
pub fn clipped_similarity(a: &[f32], b: &[f32]) -> f32 {
    let sim = cosine_similarity(a, b);
    if sim.is_nan() {
        return 0.0;
    }
    sim.clamp(0.0, 1.0)
}

/// Compares every pair of exactly three embeddings.
pub fn compute_pairwise(
    embeddings: &[NormalizedEmbedding],
) -> Result<PairwiseScores, SimilarityError> {
    let [e1, e2, e3] = embeddings else {
        return Err(SimilarityError::WrongCount {
            expected: IMAGES_PER_VERIFICATION,
            actual: embeddings.len(),
        });
    };

    Ok(PairwiseScores {
        img1_img2: clipped_similarity(e1.as_slice(), e2.as_slice()),
        img1_img3: clipped_similarity(e1.as_slice(), e3.as_slice()),
        img2_img3: clipped_similarity(e2.as_slice(), e3.as_slice()),
    })
}
