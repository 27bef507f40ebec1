//! Embedding normalization and validation.
//!
//! The detector hands back a raw `f64` vector per face. [`normalize`] scales it to
//! unit L2 norm and narrows it to `f32`; [`validate`] / [`check`] decide whether the
//! result is usable by the similarity engine.

mod error;
pub mod normalizer;


pub use error::EmbeddingError;
pub use normalizer::{
    EmbeddingNormalizer, NormalizedEmbedding, check, l2_norm, normalize, validate,
};
