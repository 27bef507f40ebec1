//! Identity decision over the three pairwise similarities.
//!
//! The verdict is conjunctive: the *minimum* pairwise score must clear the
//! threshold, so one dissimilar image cannot hide behind two matching pairs.
//! `{0.95, 0.95, 0.40}` has a mean above 0.75 and is still `DIFFERENT_PERSON`.

pub mod decider;
pub mod types;


pub use decider::IdentityDecider;
pub use types::{SimilarityAnalysis, VerificationResult, Verdict};
