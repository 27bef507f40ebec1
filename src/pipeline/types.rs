use serde::{Deserialize, Serialize};

use crate::constants::{DimConfig, SAME_PERSON_THRESHOLD};
use crate::decision::Verdict;
use crate::detector::FaceInfo;
use crate::quality::{QualityReport, QualityThresholds};
use crate::similarity::PairwiseScores;

/// Names used for the three images in logs, errors and responses.
pub const IMAGE_NAMES: [&str; 3] = ["image1", "image2", "image3"];

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub dims: DimConfig,
    pub quality: QualityThresholds,
    pub same_person_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dims: DimConfig::default(),
            quality: QualityThresholds::default(),
            same_person_threshold: SAME_PERSON_THRESHOLD,
        }
    }
}

/// Per-image diagnostics returned with a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub image_name: String,
    pub face_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_info: Option<FaceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_checks: Option<QualityReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Successful verification: verdict, raw pair scores and per-image reports.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    pub verdict: Verdict,
    pub similarity: PairwiseScores,
    pub image_analyses: Vec<ImageAnalysis>,
}
