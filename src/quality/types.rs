use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Overall classification of one image.
pub enum QualityStatus {
    /// Every check passed.
    Accept,
    /// A soft check failed; verification continues.
    Warn,
    /// The image is unusable; verification stops.
    Reject,
}

impl QualityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityStatus::Accept => "ACCEPT",
            QualityStatus::Warn => "WARN",
            QualityStatus::Reject => "REJECT",
        }
    }
}

impl std::fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Result of one quality check.
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    /// Sharpness score (blur check).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Mean intensity (brightness check).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Detector confidence (face check).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// `[x1, y1, x2, y2]` after clipping (face check).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[i64; 4]>,
}

impl CheckResult {
    pub(crate) fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
            score: None,
            value: None,
            confidence: None,
            bbox: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Per-image quality report. Built once by the gate, never mutated.
pub struct QualityReport {
    pub status: QualityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<CheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<CheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<CheckResult>,
    /// Names of failed soft checks, in check order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Set when the image itself was unusable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl QualityReport {
    pub(crate) fn invalid_image() -> Self {
        Self {
            status: QualityStatus::Reject,
            face: None,
            blur: None,
            brightness: None,
            warnings: Vec::new(),
            reason: Some("Invalid image".to_string()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.status == QualityStatus::Reject
    }

    /// Named checks that ran, in check order.
    pub fn checks(&self) -> impl Iterator<Item = (&'static str, &CheckResult)> {
        [
            ("face", self.face.as_ref()),
            ("blur", self.blur.as_ref()),
            ("brightness", self.brightness.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, check)| check.map(|c| (name, c)))
    }

    /// `"name: message"` for every failed check (or the invalid-image reason).
    pub fn failed_checks(&self) -> Vec<String> {
        let mut failed: Vec<String> = self
            .checks()
            .filter(|(_, c)| !c.passed)
            .map(|(name, c)| format!("{}: {}", name, c.message))
            .collect();
        if let Some(reason) = &self.reason {
            failed.push(reason.clone());
        }
        failed
    }
}
