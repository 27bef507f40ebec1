use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Outcome of the identity decision.
pub enum VerificationResult {
    /// Every pair cleared the threshold.
    SamePerson,
    /// At least one pair fell below the threshold.
    DifferentPerson,
}

impl VerificationResult {
    /// Returns the wire name (`SAME_PERSON` / `DIFFERENT_PERSON`).
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationResult::SamePerson => "SAME_PERSON",
            VerificationResult::DifferentPerson => "DIFFERENT_PERSON",
        }
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Summary statistics of the pairwise scores behind a verdict.
pub struct SimilarityAnalysis {
    pub min_similarity: f32,
    pub max_similarity: f32,
    pub avg_similarity: f32,
    /// Population standard deviation.
    pub std_similarity: f32,
    pub threshold_used: f32,
    pub all_pairs_pass: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Same/different decision with confidence and diagnostics.
pub struct Verdict {
    pub result: VerificationResult,
    /// In `[0, 1]`: the mean score for a match, `1 - mean` otherwise.
    pub confidence: f32,
    pub analysis: SimilarityAnalysis,
}

impl Verdict {
    pub fn is_same_person(&self) -> bool {
        self.result == VerificationResult::SamePerson
    }

    /// Human-readable summary for API responses.
    pub fn message(&self) -> String {
        let pct = self.confidence * 100.0;
        match self.result {
            VerificationResult::SamePerson => {
                format!("All 3 images contain the SAME person (confidence: {pct:.2}%)")
            }
            VerificationResult::DifferentPerson => {
                format!("Images contain DIFFERENT persons (confidence: {pct:.2}%)")
            }
        }
    }
}
