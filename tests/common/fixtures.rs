//! Test fixtures for integration tests.

use faceverify::{BoundingBox, DetectedFace, RawImage};
use image::{Rgb, RgbImage};

pub const EMBEDDING_DIM: usize = faceverify::constants::DEFAULT_EMBEDDING_DIM;

pub const IMAGE_SIZE: u32 = 240;

/// Raw (non-unit) embedding rotated `degrees` away from the first axis.
///
/// Cosine similarity of two such embeddings is `cos(a - b)`.
pub fn embedding_at_angle(degrees: f64) -> Vec<f64> {
    let radians = degrees.to_radians();
    let mut values = vec![0.0; EMBEDDING_DIM];
    values[0] = 3.0 * radians.cos();
    values[1] = 3.0 * radians.sin();
    values
}

/// Sharp, mid-brightness image that passes the soft quality checks.
pub fn sharp_image() -> RawImage {
    RawImage::new(RgbImage::from_fn(IMAGE_SIZE, IMAGE_SIZE, |x, y| {
        if (x / 2 + y / 2) % 2 == 0 {
            Rgb([30, 40, 50])
        } else {
            Rgb([220, 210, 200])
        }
    }))
}

pub fn sharp_png() -> Vec<u8> {
    sharp_image().to_png_bytes().expect("png encoding")
}

pub struct FaceBuilder {
    bbox: BoundingBox,
    confidence: f32,
    embedding: Vec<f64>,
}

impl Default for FaceBuilder {
    fn default() -> Self {
        Self {
            bbox: BoundingBox::new(20, 20, 180, 180),
            confidence: 0.99,
            embedding: embedding_at_angle(0.0),
        }
    }
}

impl FaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bbox(mut self, x: i64, y: i64, width: i64, height: i64) -> Self {
        self.bbox = BoundingBox::new(x, y, width, height);
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.embedding = embedding_at_angle(degrees);
        self
    }

    pub fn embedding(mut self, embedding: Vec<f64>) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn build(self) -> DetectedFace {
        DetectedFace::new(self.bbox, self.confidence, self.embedding)
    }
}

/// Three faces at the given angles, one per image.
pub fn faces_at(angles: [f64; 3]) -> Vec<DetectedFace> {
    angles
        .into_iter()
        .map(|a| FaceBuilder::new().angle(a).build())
        .collect()
}
