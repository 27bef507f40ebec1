use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("No face detected in image")]
    NoFaceDetected,

    #[error("Multiple faces detected ({count}). Please upload image with single face")]
    MultipleFacesDetected { count: usize },

    #[error("Face detection error: {reason}")]
    Failed { reason: String },
}

impl From<reqwest::Error> for DetectionError {
    fn from(err: reqwest::Error) -> Self {
        DetectionError::Failed {
            reason: err.to_string(),
        }
    }
}
