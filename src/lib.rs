//! Faceverify library crate (used by the server binary and integration tests).
//!
//! Decides whether three face photographs show the same person.
//!
//! # Public API Surface
//!
//! ## Verification core
//! - [`VerificationPipeline`] - detector → quality gate → normalizer → similarity → decision
//! - [`QualityGate`], [`QualityReport`] - per-image ACCEPT / WARN / REJECT
//! - [`normalize`], [`check`] - unit-norm embeddings and their validation
//! - [`compute_pairwise`], [`PairwiseScores`] - clipped cosine similarity per pair
//! - [`IdentityDecider`], [`Verdict`] - conjunctive same-person decision
//!
//! ## Seams
//! - [`FaceDetector`] - external face detector / embedding model
//! - [`ImageStore`] - persistence of verified uploads
//!
//! ## Service
//! - [`Config`], [`ConfigError`] - `FACEVERIFY_*` environment configuration
//! - [`gateway`] - Axum router and handlers
//!
//! ## Test/Mock Support
//! `MockFaceDetector` is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod decision;
pub mod detector;
pub mod embedding;
pub mod gateway;
pub mod imaging;
pub mod pipeline;
pub mod quality;
pub mod similarity;
pub mod storage;

pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError};
pub use decision::{IdentityDecider, SimilarityAnalysis, Verdict, VerificationResult};
#[cfg(any(test, feature = "mock"))]
pub use detector::MockFaceDetector;
pub use detector::{
    BoundingBox, DetectedFace, DetectionError, FaceDetector, FaceInfo, RemoteDetectorConfig,
    RemoteFaceDetector,
};
pub use embedding::{EmbeddingError, EmbeddingNormalizer, NormalizedEmbedding, check, normalize};
pub use gateway::{AppState, GatewayError, create_router};
pub use imaging::{DecodeLimits, ImageError, RawImage, decode_image};
pub use pipeline::{
    ErrorKind, ImageAnalysis, PipelineConfig, VerificationOutcome, VerificationPipeline,
    VerifyError,
};
pub use quality::{CheckResult, QualityGate, QualityReport, QualityStatus, QualityThresholds};
pub use similarity::{PairwiseScores, SimilarityError, clipped_similarity, compute_pairwise};
pub use storage::{ImageStore, ImageUpload, LocalImageStore, StorageError, StoredImage};
