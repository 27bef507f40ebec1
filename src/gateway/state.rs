use std::sync::Arc;

use crate::imaging::DecodeLimits;
use crate::pipeline::VerificationPipeline;
use crate::storage::ImageStore;

/// Multipart overhead allowed on top of the three image payloads.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: VerificationPipeline,

    pub store: Arc<dyn ImageStore>,

    pub decode_limits: DecodeLimits,

    /// Expected `X-API-Key` value. `None` disables the check.
    pub api_key: Option<String>,

    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(pipeline: VerificationPipeline, store: Arc<dyn ImageStore>) -> Self {
        Self {
            pipeline,
            store,
            decode_limits: DecodeLimits::default(),
            api_key: None,
            cors_origins: vec!["*".to_string()],
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_decode_limits(mut self, limits: DecodeLimits) -> Self {
        self.decode_limits = limits;
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Request body limit for the multipart endpoints.
    pub fn body_limit(&self) -> usize {
        self.decode_limits
            .max_bytes
            .saturating_mul(3)
            .saturating_add(FORM_OVERHEAD_BYTES)
    }
}
