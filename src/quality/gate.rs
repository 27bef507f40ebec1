use tracing::debug;

use crate::constants::{
    MAX_BRIGHTNESS, MIN_BLUR_SCORE, MIN_BRIGHTNESS, MIN_FACE_SCORE, MIN_FACE_SIZE,
};
use crate::detector::BoundingBox;
use crate::imaging::RawImage;

use super::metrics::ImageMetrics;
use super::types::{CheckResult, QualityReport, QualityStatus};

/// Limits used by [`QualityGate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    pub min_blur_score: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Minimum clipped face width and height, in pixels.
    pub min_face_size: i64,
    pub min_face_score: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_blur_score: MIN_BLUR_SCORE,
            min_brightness: MIN_BRIGHTNESS,
            max_brightness: MAX_BRIGHTNESS,
            min_face_size: MIN_FACE_SIZE,
            min_face_score: MIN_FACE_SCORE,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QualityGate {
    thresholds: QualityThresholds,
}

impl QualityGate {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Runs every check on `image` for the detector's `bbox` / `confidence`.
    ///
    /// Sharpness and brightness are only measured when the face check passes.
    pub fn assess(&self, image: &RawImage, bbox: &BoundingBox, confidence: f32) -> QualityReport {
        if image.is_empty() {
            debug!("Rejecting empty image");
            return QualityReport::invalid_image();
        }

        let face = self.check_face(bbox, confidence, image.width(), image.height());
        if !face.passed {
            return Self::rejected(face);
        }

        let metrics = ImageMetrics::measure(image.pixels());
        self.classify(face, metrics)
    }

    /// Decision over an already-evaluated face check and measured metrics.
    pub fn classify(&self, face: CheckResult, metrics: ImageMetrics) -> QualityReport {
        if !face.passed {
            return Self::rejected(face);
        }

        let blur = self.check_blur(metrics.blur_score);
        let brightness = self.check_brightness(metrics.brightness);

        let warnings: Vec<String> = [("blur", &blur), ("brightness", &brightness)]
            .into_iter()
            .filter(|(_, check)| !check.passed)
            .map(|(name, _)| name.to_string())
            .collect();

        let status = if warnings.is_empty() {
            QualityStatus::Accept
        } else {
            QualityStatus::Warn
        };

        debug!(
            status = %status,
            blur_score = metrics.blur_score,
            brightness = metrics.brightness,
            "Quality assessed"
        );

        QualityReport {
            status,
            face: Some(face),
            blur: Some(blur),
            brightness: Some(brightness),
            warnings,
            reason: None,
        }
    }

    fn rejected(face: CheckResult) -> QualityReport {
        debug!(message = %face.message, "Face check failed");
        QualityReport {
            status: QualityStatus::Reject,
            face: Some(face),
            blur: None,
            brightness: None,
            warnings: Vec::new(),
            reason: None,
        }
    }

    /// Hard check: detector confidence, then clipped box size.
    ///
    /// Clipping saturates to the image bounds and never fails.
    pub fn check_face(
        &self,
        bbox: &BoundingBox,
        confidence: f32,
        image_width: u32,
        image_height: u32,
    ) -> CheckResult {
        let reported_confidence = round_to(confidence as f64, 3) as f32;

        if confidence.is_nan() || confidence < self.thresholds.min_face_score {
            let mut check =
                CheckResult::new(false, format!("Low face confidence ({:.2})", confidence));
            check.confidence = Some(reported_confidence);
            check.bbox = Some(bbox.corners());
            return check;
        }

        let (w, h) = (image_width as i64, image_height as i64);
        let [bx1, by1, bx2, by2] = bbox.corners();

        let x1 = bx1.min(w - 1).max(0);
        let y1 = by1.min(h - 1).max(0);
        let x2 = bx2.min(w).max(0);
        let y2 = by2.min(h).max(0);

        let width = x2 - x1;
        let height = y2 - y1;

        let mut check = if width < self.thresholds.min_face_size
            || height < self.thresholds.min_face_size
        {
            CheckResult::new(false, format!("Face too small ({}x{}px)", width, height))
        } else {
            CheckResult::new(true, "Face OK")
        };
        check.confidence = Some(reported_confidence);
        check.bbox = Some([x1, y1, x2, y2]);
        check
    }

    /// Soft check on the Laplacian-variance sharpness score.
    pub fn check_blur(&self, blur_score: f64) -> CheckResult {
        let mut check = if blur_score < self.thresholds.min_blur_score {
            CheckResult::new(
                false,
                format!("Image slightly blurry (score: {:.1})", blur_score),
            )
        } else {
            CheckResult::new(true, "Blur OK")
        };
        check.score = Some(round_to(blur_score, 2));
        check
    }

    /// Soft check on mean grayscale intensity.
    pub fn check_brightness(&self, brightness: f64) -> CheckResult {
        let mut check = if brightness < self.thresholds.min_brightness {
            CheckResult::new(false, format!("Image too dark ({:.1})", brightness))
        } else if brightness > self.thresholds.max_brightness {
            CheckResult::new(false, format!("Image too bright ({:.1})", brightness))
        } else {
            CheckResult::new(true, "Brightness OK")
        };
        check.value = Some(round_to(brightness, 2));
        check
    }
}
