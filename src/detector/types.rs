use serde::{Deserialize, Serialize};

/// Axis-aligned face box in pixel coordinates.
///
/// Detectors may report boxes that extend past the image; the quality gate clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl BoundingBox {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `[x1, y1, x2, y2]`.
    pub fn corners(&self) -> [i64; 4] {
        [
            self.x,
            self.y,
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        ]
    }

    pub fn area(&self) -> i64 {
        self.width.max(0).saturating_mul(self.height.max(0))
    }
}

/// One face as returned by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    pub bbox: BoundingBox,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f32,
    /// Raw (not yet normalized) embedding.
    pub embedding: Vec<f64>,
}

impl DetectedFace {
    pub fn new(bbox: BoundingBox, confidence: f32, embedding: Vec<f64>) -> Self {
        Self {
            bbox,
            confidence,
            embedding,
        }
    }

    /// Diagnostics reported back to the caller.
    pub fn info(&self) -> FaceInfo {
        FaceInfo {
            bbox: self.bbox.corners(),
            confidence: self.confidence,
            face_area: self.bbox.area(),
            embedding_dim: self.embedding.len(),
        }
    }
}

/// Per-face diagnostics included in the image analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    /// `[x1, y1, x2, y2]` as reported by the detector (unclipped).
    pub bbox: [i64; 4],
    pub confidence: f32,
    pub face_area: i64,
    pub embedding_dim: usize,
}
