use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    #[error("no usable embedding: vector is empty")]
    Empty,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding contains non-finite component at index {index}")]
    NonFinite { index: usize },

    #[error("embedding is not unit norm (norm: {norm:.4})")]
    NotUnitNorm { norm: f32 },
}
