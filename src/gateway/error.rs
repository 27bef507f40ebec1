use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::imaging::ImageError;
use crate::pipeline::{ErrorKind, VerifyError};
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{image}: Invalid image format ({source})")]
    InvalidImage {
        image: String,
        #[source]
        source: ImageError,
    },

    #[error(transparent)]
    Verification(#[from] VerifyError),

    #[error(
        "Images do not appear to be the same person (confidence: {:.2}%). Verification failed.",
        .confidence * 100.0
    )]
    DifferentPerson { confidence: f32 },

    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("Failed to store verified images: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub detail: String,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_)
            | GatewayError::InvalidImage { .. }
            | GatewayError::DifferentPerson { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Verification(e) => match e.kind() {
                ErrorKind::Input | ErrorKind::Detection | ErrorKind::QualityRejection => {
                    StatusCode::BAD_REQUEST
                }
                ErrorKind::Validation | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Storage(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "INVALID_REQUEST",
            GatewayError::InvalidImage { .. } => "INVALID_IMAGE",
            GatewayError::Verification(e) => match e.kind() {
                ErrorKind::Input => "INVALID_IMAGE",
                ErrorKind::Detection => "DETECTION_FAILED",
                ErrorKind::QualityRejection => "QUALITY_REJECTED",
                ErrorKind::Validation => "EMBEDDING_INVALID",
                ErrorKind::Internal => "INTERNAL_ERROR",
            },
            GatewayError::DifferentPerson { .. } => "DIFFERENT_PERSON",
            GatewayError::Unauthorized => "UNAUTHORIZED",
            GatewayError::Storage(_) => "STORAGE_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            code: self.code().to_string(),
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
