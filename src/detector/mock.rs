use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::imaging::RawImage;

use super::FaceDetector;
use super::error::DetectionError;
use super::types::DetectedFace;

/// Replays scripted detector results in call order.
///
/// Once the script is exhausted every call fails with [`DetectionError::Failed`].
#[derive(Default)]
pub struct MockFaceDetector {
    script: Mutex<VecDeque<Result<Vec<DetectedFace>, DetectionError>>>,
    calls: AtomicUsize,
}

impl MockFaceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts one single-face result per entry.
    pub fn with_faces(faces: impl IntoIterator<Item = DetectedFace>) -> Self {
        let mock = Self::new();
        for face in faces {
            mock.push_faces(vec![face]);
        }
        mock
    }

    pub fn push_faces(&self, faces: Vec<DetectedFace>) {
        self.push_result(Ok(faces));
    }

    pub fn push_error(&self, error: DetectionError) {
        self.push_result(Err(error));
    }

    pub fn push_result(&self, result: Result<Vec<DetectedFace>, DetectionError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(result);
        }
    }

    /// Number of `detect_faces` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl FaceDetector for MockFaceDetector {
    async fn detect_faces(&self, _image: &RawImage) -> Result<Vec<DetectedFace>, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = self
            .script
            .lock()
            .map_err(|_| DetectionError::Failed {
                reason: "lock poisoned".to_string(),
            })?
            .pop_front();

        next.unwrap_or_else(|| {
            Err(DetectionError::Failed {
                reason: "mock detector has no scripted response".to_string(),
            })
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
