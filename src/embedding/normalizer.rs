use tracing::debug;

use crate::constants::{DimConfig, MAX_UNIT_NORM, MIN_UNIT_NORM};

use super::error::EmbeddingError;

/// Unit-L2-norm face embedding (output of [`normalize`]).
///
/// A zero input vector passes through `normalize` unchanged, so holding a
/// `NormalizedEmbedding` does not by itself prove validity; run [`check`] first.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEmbedding {
    values: Vec<f32>,
}

impl NormalizedEmbedding {
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// L2 norm of the stored vector.
    pub fn norm(&self) -> f32 {
        l2_norm(&self.values)
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

#[inline]
pub fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Scales `raw` to unit L2 norm and narrows it to `f32`.
///
/// The norm is computed in `f64`. A zero-norm vector is returned unchanged.
pub fn normalize(raw: &[f64]) -> Result<NormalizedEmbedding, EmbeddingError> {
    if raw.is_empty() {
        debug!("Empty embedding");
        return Err(EmbeddingError::Empty);
    }

    let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();

    let values = if norm > 0.0 {
        raw.iter().map(|v| (v / norm) as f32).collect()
    } else {
        raw.iter().map(|&v| v as f32).collect()
    };

    Ok(NormalizedEmbedding { values })
}

/// Returns the first reason `embedding` is unusable, if any.
pub fn check(embedding: &NormalizedEmbedding, expected_dim: usize) -> Result<(), EmbeddingError> {
    if embedding.dim() != expected_dim {
        return Err(EmbeddingError::DimensionMismatch {
            expected: expected_dim,
            actual: embedding.dim(),
        });
    }

    if let Some(index) = embedding.values.iter().position(|v| !v.is_finite()) {
        return Err(EmbeddingError::NonFinite { index });
    }

    let norm = embedding.norm();
    if !(MIN_UNIT_NORM..=MAX_UNIT_NORM).contains(&norm) {
        return Err(EmbeddingError::NotUnitNorm { norm });
    }

    Ok(())
}

/// `true` if `embedding` is present, `expected_dim` wide, finite and unit norm.
pub fn validate(embedding: Option<&NormalizedEmbedding>, expected_dim: usize) -> bool {
    embedding.is_some_and(|e| check(e, expected_dim).is_ok())
}

/// Normalizer bound to an embedding-width policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddingNormalizer {
    dims: DimConfig,
}

impl EmbeddingNormalizer {
    pub fn new(dims: DimConfig) -> Self {
        Self { dims }
    }

    /// Configured width, if pinned.
    pub fn configured_dim(&self) -> Option<usize> {
        self.dims.embedding_dim
    }

    /// Normalizes `raw` and validates it against the call's expected width.
    ///
    /// `expected_dim` starts as [`configured_dim`](Self::configured_dim). When it is
    /// `None` the first embedding fixes it; it is never overwritten afterwards.
    pub fn normalize_and_check(
        &self,
        raw: &[f64],
        expected_dim: &mut Option<usize>,
    ) -> Result<NormalizedEmbedding, EmbeddingError> {
        let embedding = normalize(raw)?;
        let expected = *expected_dim.get_or_insert(embedding.dim());
        check(&embedding, expected)?;
        Ok(embedding)
    }
}
