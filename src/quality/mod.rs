//! Per-image quality gate.
//!
//! | check        | metric                                        | failure  |
//! |--------------|-----------------------------------------------|----------|
//! | `face`       | detector confidence + clipped bbox size       | `REJECT` |
//! | `blur`       | Laplacian variance of equalized grayscale     | `WARN`   |
//! | `brightness` | mean grayscale intensity                      | `WARN`   |
//!
//! The face check runs first and is the only hard gate; sharpness and brightness
//! are measured only once it passes. `WARN` never stops verification.

pub mod gate;
pub mod metrics;
pub mod types;


pub use gate::{QualityGate, QualityThresholds};
pub use metrics::{
    ImageMetrics, blur_score, equalize_histogram, laplacian_variance, mean_brightness,
    to_grayscale,
};
pub use types::{CheckResult, QualityReport, QualityStatus};
