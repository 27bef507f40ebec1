use thiserror::Error;

use crate::detector::DetectionError;
use crate::embedding::EmbeddingError;
use crate::similarity::SimilarityError;

/// Error category at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input (bad image, wrong embedding count).
    Input,
    /// No face, several faces, or a detector failure.
    Detection,
    /// Hard quality failure.
    QualityRejection,
    /// The detector produced an unusable embedding.
    Validation,
    Internal,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{image}: Invalid image format")]
    InvalidImage { image: String },

    #[error("{0}")]
    Similarity(#[from] SimilarityError),

    #[error("{image}: {source}")]
    Detection {
        image: String,
        #[source]
        source: DetectionError,
    },

    #[error("{image}: Quality check failed - {}", .failed_checks.join("; "))]
    QualityRejected {
        image: String,
        failed_checks: Vec<String>,
    },

    #[error("{image}: Failed to extract face embedding ({source})")]
    Validation {
        image: String,
        #[source]
        source: EmbeddingError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::InvalidImage { .. } | VerifyError::Similarity(_) => ErrorKind::Input,
            VerifyError::Detection { .. } => ErrorKind::Detection,
            VerifyError::QualityRejected { .. } => ErrorKind::QualityRejection,
            VerifyError::Validation { .. } => ErrorKind::Validation,
            VerifyError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Name of the offending image, if the failure is tied to one.
    pub fn image(&self) -> Option<&str> {
        match self {
            VerifyError::InvalidImage { image }
            | VerifyError::Detection { image, .. }
            | VerifyError::QualityRejected { image, .. }
            | VerifyError::Validation { image, .. } => Some(image.as_str()),
            VerifyError::Similarity(_) | VerifyError::Internal(_) => None,
        }
    }
}
