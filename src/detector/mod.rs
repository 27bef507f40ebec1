//! Seam to the external face detector / embedding model.
//!
//! The core never runs a model. It consumes [`DetectedFace`] values from a
//! [`FaceDetector`] implementation that is built once at startup and shared as an
//! `Arc<dyn FaceDetector>`:
//!
//! - [`RemoteFaceDetector`] calls an HTTP face-embedding service.
//! - `MockFaceDetector` replays scripted results (tests and the `mock` feature).

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod remote;
mod types;


pub use error::DetectionError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFaceDetector;
pub use remote::{
    DEFAULT_DETECTOR_TIMEOUT_SECS, RemoteDetectorConfig, RemoteFaceDetector,
    parse_detector_response,
};
pub use types::{BoundingBox, DetectedFace, FaceInfo};

use async_trait::async_trait;

use crate::imaging::RawImage;

#[async_trait]
/// Face localization + embedding extraction.
pub trait FaceDetector: Send + Sync {
    /// Returns every face found in `image` (possibly none).
    async fn detect_faces(&self, image: &RawImage) -> Result<Vec<DetectedFace>, DetectionError>;

    /// Returns the only face in `image`, failing on zero or several faces.
    async fn detect_single_face(&self, image: &RawImage) -> Result<DetectedFace, DetectionError> {
        select_single_face(self.detect_faces(image).await?)
    }

    /// Short backend label for logs and health output.
    fn name(&self) -> &str;
}

/// Enforces "exactly one face per image".
pub fn select_single_face(mut faces: Vec<DetectedFace>) -> Result<DetectedFace, DetectionError> {
    match faces.len() {
        0 => Err(DetectionError::NoFaceDetected),
        1 => Ok(faces.remove(0)),
        count => Err(DetectionError::MultipleFacesDetected { count }),
    }
}
