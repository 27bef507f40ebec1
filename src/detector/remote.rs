//! HTTP adapter for an external face-embedding service.
//!
//! The service receives the image as `image/png` and answers with:
//!
//! ```json
//! { "faces": [ { "facial_area": { "x": 10, "y": 20, "w": 150, "h": 180 },
//!                "confidence": 0.99,
//!                "embedding": [0.01, -0.2, ...] } ] }
//! ```
//!
//! `confidence` defaults to `1.0` when the service omits it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::imaging::RawImage;

use super::FaceDetector;
use super::error::DetectionError;
use super::types::{BoundingBox, DetectedFace};

pub const DEFAULT_DETECTOR_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct RemoteDetectorConfig {
    /// Endpoint receiving `POST` requests with the PNG body.
    pub url: String,
    pub timeout: Duration,
}

impl RemoteDetectorConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_DETECTOR_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct DetectorResponse {
    #[serde(default)]
    faces: Vec<RemoteFace>,
}

#[derive(Debug, Deserialize)]
struct RemoteFace {
    facial_area: FacialArea,
    #[serde(default = "default_confidence")]
    confidence: f32,
    embedding: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct FacialArea {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

fn default_confidence() -> f32 {
    1.0
}

impl From<RemoteFace> for DetectedFace {
    fn from(face: RemoteFace) -> Self {
        let area = face.facial_area;
        DetectedFace {
            bbox: BoundingBox::new(
                area.x.round() as i64,
                area.y.round() as i64,
                area.w.round() as i64,
                area.h.round() as i64,
            ),
            confidence: face.confidence,
            embedding: face.embedding,
        }
    }
}

/// Parses a detector service response body.
pub fn parse_detector_response(body: &[u8]) -> Result<Vec<DetectedFace>, DetectionError> {
    let response: DetectorResponse =
        serde_json::from_slice(body).map_err(|e| DetectionError::Failed {
            reason: format!("invalid detector response: {}", e),
        })?;
    Ok(response.faces.into_iter().map(DetectedFace::from).collect())
}

/// [`FaceDetector`] backed by an HTTP face-embedding service.
#[derive(Debug, Clone)]
pub struct RemoteFaceDetector {
    config: RemoteDetectorConfig,
    http: HttpClient,
}

impl RemoteFaceDetector {
    pub fn new(config: RemoteDetectorConfig) -> Result<Self, DetectionError> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl FaceDetector for RemoteFaceDetector {
    async fn detect_faces(&self, image: &RawImage) -> Result<Vec<DetectedFace>, DetectionError> {
        let image = image.clone();
        let png = tokio::task::spawn_blocking(move || image.to_png_bytes())
            .await
            .map_err(|e| DetectionError::Failed {
                reason: format!("encoder task failed: {}", e),
            })?
            .map_err(|e| DetectionError::Failed {
                reason: e.to_string(),
            })?;

        debug!(url = %self.config.url, bytes = png.len(), "Calling face detector");

        let response = self
            .http
            .post(&self.config.url)
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(png)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Face detector returned an error status");
            return Err(DetectionError::Failed {
                reason: format!("detector returned status {}", status),
            });
        }

        let body = response.bytes().await?;
        parse_detector_response(&body)
    }

    fn name(&self) -> &str {
        "remote"
    }
}
