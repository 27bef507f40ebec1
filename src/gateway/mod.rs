//! HTTP gateway (Axum) for the verification endpoints.
//!
//! | route                          | handler                      |
//! |--------------------------------|------------------------------|
//! | `GET /`                        | service info                 |
//! | `GET /api/health`              | liveness + detector backend  |
//! | `POST /api/verify`             | [`verify_handler`]           |
//! | `POST /api/verify-and-store`   | [`verify_and_store_handler`] |

pub mod error;
pub mod handler;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{
    API_KEY_HEADER, VerificationResponse, VerifyAndStoreResponse, verify_and_store_handler,
    verify_handler,
};
pub use state::AppState;

use crate::constants::SERVICE_VERSION;

pub const SERVICE_NAME: &str = "Face Verification API";

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);
    let body_limit = state.body_limit();

    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/verify", post(verify_handler))
        .route("/api/verify-and-store", post(verify_and_store_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS layer. Any `*` entry allows every origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub detector: String,
    pub version: String,
}

#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: true,
        detector: state.pipeline.detector().name().to_string(),
        version: SERVICE_VERSION.to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Endpoints {
    pub verify: String,
    pub verify_and_store: String,
    pub health: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
    pub endpoints: Endpoints,
}

pub async fn root_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
        status: "running".to_string(),
        endpoints: Endpoints {
            verify: "POST /api/verify".to_string(),
            verify_and_store: "POST /api/verify-and-store".to_string(),
            health: "GET /api/health".to_string(),
        },
    })
}
