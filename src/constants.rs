//! Cross-cutting, shared constants.
//!
//! Thresholds used by the quality gate and the identity decision live here so the
//! config layer, the core, and the tests agree on the same defaults.
//!
//! # Embedding Dimension
//!
//! The detector decides the embedding width (Facenet512 produces 512 floats). The
//! pipeline never overwrites the expected width once it is known:
//!
//! 1. If [`DimConfig`] carries an explicit dimension, every embedding must match it.
//! 2. Otherwise the first embedding of a verification call fixes the width for the
//!    remaining two images of that call.

/// Width produced by the reference detector model.
pub const DEFAULT_EMBEDDING_DIM: usize = 512;

/// Minimum pairwise similarity for all three pairs to count as the same person.
pub const SAME_PERSON_THRESHOLD: f32 = 0.75;

/// Number of images compared by a single verification call.
pub const IMAGES_PER_VERIFICATION: usize = 3;

/// Accepted L2 norm band for a normalized embedding.
pub const MIN_UNIT_NORM: f32 = 0.99;
pub const MAX_UNIT_NORM: f32 = 1.01;

pub const MIN_BLUR_SCORE: f64 = 18.0;
pub const MIN_BRIGHTNESS: f64 = 30.0;
pub const MAX_BRIGHTNESS: f64 = 225.0;
pub const MIN_FACE_SIZE: i64 = 80;
pub const MIN_FACE_SCORE: f32 = 0.70;

pub const DEFAULT_MAX_IMAGE_SIZE_MB: u64 = 10;
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 1920;

/// Service version reported by the health and root endpoints.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Expected embedding width for a verification call.
///
/// `None` means "infer from the first embedding of the call".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimConfig {
    /// Fixed embedding dimension, if configured.
    pub embedding_dim: Option<usize>,
}

impl DimConfig {
    /// Creates a configuration pinned to `embedding_dim`.
    pub fn fixed(embedding_dim: usize) -> Self {
        Self {
            embedding_dim: Some(embedding_dim),
        }
    }

    /// Creates a configuration that infers the width per call.
    pub fn inferred() -> Self {
        Self {
            embedding_dim: None,
        }
    }

    /// Validates the configured dimension, if any.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        match self.embedding_dim {
            Some(0) => Err(DimValidationError::ZeroDimension),
            _ => Ok(()),
        }
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
        }
    }
}

impl std::error::Error for DimValidationError {}
