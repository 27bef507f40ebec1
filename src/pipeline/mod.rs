//! Three-image verification pipeline.
//!
//! For each image, in order: detector → quality gate → embedding normalizer. The
//! first failure aborts the whole call; a verdict is only produced from three
//! usable embeddings.

mod error;
pub mod types;


pub use error::{ErrorKind, VerifyError};
pub use types::{IMAGE_NAMES, ImageAnalysis, PipelineConfig, VerificationOutcome};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::decision::IdentityDecider;
use crate::detector::FaceDetector;
use crate::embedding::{EmbeddingNormalizer, NormalizedEmbedding};
use crate::imaging::RawImage;
use crate::quality::{QualityGate, QualityStatus};
use crate::similarity::compute_pairwise;

#[derive(Clone)]
pub struct VerificationPipeline {
    detector: Arc<dyn FaceDetector>,
    normalizer: EmbeddingNormalizer,
    gate: QualityGate,
    decider: IdentityDecider,
}

impl std::fmt::Debug for VerificationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationPipeline")
            .field("detector", &self.detector.name())
            .field("normalizer", &self.normalizer)
            .field("gate", &self.gate)
            .field("decider", &self.decider)
            .finish()
    }
}

impl VerificationPipeline {
    pub fn new(detector: Arc<dyn FaceDetector>, config: PipelineConfig) -> Self {
        Self {
            detector,
            normalizer: EmbeddingNormalizer::new(config.dims),
            gate: QualityGate::new(config.quality),
            decider: IdentityDecider::new(config.same_person_threshold),
        }
    }

    pub fn detector(&self) -> &Arc<dyn FaceDetector> {
        &self.detector
    }

    pub fn decider(&self) -> &IdentityDecider {
        &self.decider
    }

    /// Verifies that all three images show the same person.
    pub async fn verify(&self, images: [RawImage; 3]) -> Result<VerificationOutcome, VerifyError> {
        let started = Instant::now();
        let mut expected_dim = self.normalizer.configured_dim();
        let mut embeddings = Vec::with_capacity(IMAGE_NAMES.len());
        let mut image_analyses = Vec::with_capacity(IMAGE_NAMES.len());

        for (name, image) in IMAGE_NAMES.into_iter().zip(images) {
            let (embedding, analysis) = self.process_image(name, image, &mut expected_dim).await?;
            embeddings.push(embedding);
            image_analyses.push(analysis);
        }

        let similarity = compute_pairwise(&embeddings)?;
        let verdict = self.decider.decide(&similarity);

        info!(
            result = %verdict.result,
            confidence = verdict.confidence,
            min_similarity = verdict.analysis.min_similarity,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Verification completed"
        );

        Ok(VerificationOutcome {
            verdict,
            similarity,
            image_analyses,
        })
    }

    async fn process_image(
        &self,
        name: &'static str,
        image: RawImage,
        expected_dim: &mut Option<usize>,
    ) -> Result<(NormalizedEmbedding, ImageAnalysis), VerifyError> {
        if image.is_empty() {
            return Err(VerifyError::InvalidImage {
                image: name.to_string(),
            });
        }

        let face = self
            .detector
            .detect_single_face(&image)
            .await
            .map_err(|source| VerifyError::Detection {
                image: name.to_string(),
                source,
            })?;

        debug!(
            image = name,
            confidence = face.confidence,
            embedding_dim = face.embedding.len(),
            "Face detected"
        );

        let gate = self.gate;
        let (bbox, confidence) = (face.bbox, face.confidence);
        let report = tokio::task::spawn_blocking(move || gate.assess(&image, &bbox, confidence))
            .await
            .map_err(|e| VerifyError::Internal(format!("quality task failed: {}", e)))?;

        if report.is_rejected() {
            let failed_checks = report.failed_checks();
            warn!(image = name, failed = ?failed_checks, "Quality check rejected image");
            return Err(VerifyError::QualityRejected {
                image: name.to_string(),
                failed_checks,
            });
        }
        if report.status == QualityStatus::Warn {
            warn!(image = name, warnings = ?report.warnings, "Quality warnings");
        }

        let embedding = self
            .normalizer
            .normalize_and_check(&face.embedding, expected_dim)
            .map_err(|source| VerifyError::Validation {
                image: name.to_string(),
                source,
            })?;

        let analysis = ImageAnalysis {
            image_name: name.to_string(),
            face_detected: true,
            face_info: Some(face.info()),
            quality_checks: Some(report),
            error: None,
        };

        Ok((embedding, analysis))
    }
}
