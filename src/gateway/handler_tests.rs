//! Router-level tests for the verification endpoints.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
};
use http_body_util::BodyExt;
use image::{Rgb, RgbImage};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::detector::{BoundingBox, DetectedFace, DetectionError, MockFaceDetector};
use crate::gateway::create_router;
use crate::gateway::error::GatewayError;
use crate::gateway::state::AppState;
use crate::imaging::{DecodeLimits, RawImage};
use crate::pipeline::{PipelineConfig, VerificationPipeline, VerifyError};
use crate::storage::{LocalImageStore, StorageError};

const BOUNDARY: &str = "faceverify-test-boundary";

enum Part<'a> {
    File(&'a str, Vec<u8>),
    Text(&'a str, &'a str),
}

fn png_bytes() -> Vec<u8> {
    RawImage::new(RgbImage::from_fn(200, 200, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([20, 20, 20])
        } else {
            Rgb([230, 230, 230])
        }
    }))
    .to_png_bytes()
    .expect("png encoding")
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File(name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.png\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn three_images() -> Vec<Part<'static>> {
    vec![
        Part::File("image1", png_bytes()),
        Part::File("image2", png_bytes()),
        Part::File("image3", png_bytes()),
    ]
}

fn multipart_request(uri: &str, parts: &[Part<'_>], api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder
        .body(Body::from(multipart_body(parts)))
        .expect("request")
}

fn face(embedding: Vec<f64>) -> DetectedFace {
    DetectedFace::new(BoundingBox::new(10, 10, 150, 150), 0.99, embedding)
}

fn same_person_mock() -> Arc<MockFaceDetector> {
    Arc::new(MockFaceDetector::with_faces([
        face(vec![1.0, 0.1, 0.0]),
        face(vec![1.0, 0.0, 0.1]),
        face(vec![1.0, 0.05, 0.05]),
    ]))
}

fn different_person_mock() -> Arc<MockFaceDetector> {
    Arc::new(MockFaceDetector::with_faces([
        face(vec![1.0, 0.0, 0.0]),
        face(vec![1.0, 0.0, 0.0]),
        face(vec![0.0, 1.0, 0.0]),
    ]))
}

fn test_state(mock: Arc<MockFaceDetector>, dir: &TempDir) -> AppState {
    let pipeline = VerificationPipeline::new(mock, PipelineConfig::default());
    let store = Arc::new(LocalImageStore::new(dir.path().join("uploads")));
    AppState::new(pipeline, store)
}

fn test_router(mock: Arc<MockFaceDetector>, dir: &TempDir) -> Router {
    create_router(test_state(mock, dir))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

// ── service endpoints ──

#[tokio::test]
async fn test_health_reports_detector() {
    let dir = TempDir::new().unwrap();
    let response = test_router(same_person_mock(), &dir)
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["detector"], "mock");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_allows_only_configured_origins() {
    let dir = TempDir::new().unwrap();
    let state = test_state(same_person_mock(), &dir)
        .with_cors_origins(vec!["https://app.example".to_string()]);
    let router = create_router(state);

    let allowed = router
        .clone()
        .oneshot(
            Request::get("/api/health")
                .header("Origin", "https://app.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://app.example"
    );

    let denied = router
        .oneshot(
            Request::get("/api/health")
                .header("Origin", "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        !denied
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let dir = TempDir::new().unwrap();
    let response = test_router(same_person_mock(), &dir)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "running");
    assert_eq!(json["endpoints"]["verify"], "POST /api/verify");
    assert_eq!(
        json["endpoints"]["verify_and_store"],
        "POST /api/verify-and-store"
    );
}

// ── /api/verify ──

#[tokio::test]
async fn test_verify_same_person() {
    let dir = TempDir::new().unwrap();
    let response = test_router(same_person_mock(), &dir)
        .oneshot(multipart_request("/api/verify", &three_images(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["result"], "SAME_PERSON");
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .starts_with("All 3 images contain the SAME person")
    );
    assert_eq!(json["analysis"]["all_pairs_pass"], true);
    assert_eq!(json["image_analyses"].as_array().unwrap().len(), 3);
    assert_eq!(json["image_analyses"][0]["quality_checks"]["status"], "ACCEPT");
    assert!(!dir.path().join("uploads").exists(), "verify must not store");
}

#[tokio::test]
async fn test_verify_different_person_is_ok_response() {
    let dir = TempDir::new().unwrap();
    let response = test_router(different_person_mock(), &dir)
        .oneshot(multipart_request("/api/verify", &three_images(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["result"], "DIFFERENT_PERSON");
    assert_eq!(json["analysis"]["all_pairs_pass"], false);
}

#[tokio::test]
async fn test_verify_missing_image_field() {
    let dir = TempDir::new().unwrap();
    let mock = same_person_mock();
    let parts = vec![
        Part::File("image1", png_bytes()),
        Part::File("image2", png_bytes()),
    ];

    let response = test_router(mock.clone(), &dir)
        .oneshot(multipart_request("/api/verify", &parts, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_REQUEST");
    assert_eq!(json["detail"], "Missing file field 'image3'");
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_verify_corrupt_image() {
    let dir = TempDir::new().unwrap();
    let parts = vec![
        Part::File("image1", png_bytes()),
        Part::File("image2", b"definitely not an image".to_vec()),
        Part::File("image3", png_bytes()),
    ];

    let response = test_router(same_person_mock(), &dir)
        .oneshot(multipart_request("/api/verify", &parts, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Bad Request");
    assert_eq!(json["code"], "INVALID_IMAGE");
    assert!(
        json["detail"]
            .as_str()
            .unwrap()
            .starts_with("image2: Invalid image format")
    );
}

#[tokio::test]
async fn test_verify_oversized_image() {
    let dir = TempDir::new().unwrap();
    let state = test_state(same_person_mock(), &dir).with_decode_limits(DecodeLimits {
        max_bytes: 64,
        max_dimension: 1920,
    });

    let response = create_router(state)
        .oneshot(multipart_request("/api/verify", &three_images(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_IMAGE");
}

#[tokio::test]
async fn test_verify_detection_failure() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockFaceDetector::new());
    mock.push_error(DetectionError::NoFaceDetected);

    let response = test_router(mock, &dir)
        .oneshot(multipart_request("/api/verify", &three_images(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "DETECTION_FAILED");
    assert_eq!(json["detail"], "image1: No face detected in image");
}

#[tokio::test]
async fn test_verify_quality_rejection() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockFaceDetector::new());
    mock.push_faces(vec![face(vec![1.0, 0.0])]);
    mock.push_faces(vec![DetectedFace::new(
        BoundingBox::new(0, 0, 50, 50),
        0.9,
        vec![1.0, 0.0],
    )]);

    let response = test_router(mock, &dir)
        .oneshot(multipart_request("/api/verify", &three_images(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "QUALITY_REJECTED");
    assert_eq!(
        json["detail"],
        "image2: Quality check failed - face: Face too small (50x50px)"
    );
}

#[tokio::test]
async fn test_verify_invalid_embedding_is_server_error() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockFaceDetector::with_faces([face(vec![0.0, 0.0, 0.0])]));

    let response = test_router(mock, &dir)
        .oneshot(multipart_request("/api/verify", &three_images(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["code"], "EMBEDDING_INVALID");
    assert!(
        json["detail"]
            .as_str()
            .unwrap()
            .starts_with("image1: Failed to extract face embedding")
    );
}

// ── API key ──

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let dir = TempDir::new().unwrap();
    let mock = same_person_mock();
    let state = test_state(mock.clone(), &dir).with_api_key(Some("s3cret".to_string()));
    let router = create_router(state);

    let missing = router
        .clone()
        .oneshot(multipart_request("/api/verify", &three_images(), None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(missing).await["code"], "UNAUTHORIZED");

    let wrong = router
        .clone()
        .oneshot(multipart_request(
            "/api/verify",
            &three_images(),
            Some("nope"),
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(mock.calls(), 0);

    let ok = router
        .oneshot(multipart_request(
            "/api/verify",
            &three_images(),
            Some("s3cret"),
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
}

// ── /api/verify-and-store ──

#[tokio::test]
async fn test_verify_and_store_persists_images() {
    let dir = TempDir::new().unwrap();
    let mut parts = three_images();
    parts.push(Part::Text("user_id", "user-7"));

    let response = test_router(same_person_mock(), &dir)
        .oneshot(multipart_request("/api/verify-and-store", &parts, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["result"], "SAME_PERSON");
    assert_eq!(
        json["message"],
        "All 3 images verified as same person and stored successfully."
    );

    let stored = json["stored_images"].as_array().unwrap();
    assert_eq!(stored.len(), 3);
    for (i, record) in stored.iter().enumerate() {
        assert_eq!(record["original_filename"], format!("image{}.png", i + 1));
        assert_eq!(record["mimetype"], "image/png");
        assert_eq!(record["user_id"], "user-7");
        let path = std::path::PathBuf::from(record["storage_path"].as_str().unwrap());
        assert!(path.starts_with(dir.path().join("uploads")));
        assert_eq!(std::fs::read(&path).unwrap(), png_bytes());
    }
}

#[tokio::test]
async fn test_verify_and_store_rejects_different_person() {
    let dir = TempDir::new().unwrap();

    let response = test_router(different_person_mock(), &dir)
        .oneshot(multipart_request(
            "/api/verify-and-store",
            &three_images(),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "DIFFERENT_PERSON");
    assert!(
        json["detail"]
            .as_str()
            .unwrap()
            .starts_with("Images do not appear to be the same person")
    );
    assert!(!dir.path().join("uploads").exists());
}

// ── error mapping ──

#[test]
fn test_gateway_error_status_mapping() {
    let cases = [
        (
            GatewayError::InvalidRequest("bad".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            GatewayError::Verification(VerifyError::InvalidImage {
                image: "image1".to_string(),
            }),
            StatusCode::BAD_REQUEST,
        ),
        (
            GatewayError::Verification(VerifyError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            GatewayError::DifferentPerson { confidence: 0.4 },
            StatusCode::BAD_REQUEST,
        ),
        (GatewayError::Unauthorized, StatusCode::UNAUTHORIZED),
        (
            GatewayError::Storage(StorageError::EmptyUpload {
                filename: "a.jpg".to_string(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.status(), expected, "{err}");
        assert_eq!(err.into_response().status(), expected);
    }
}

#[test]
fn test_different_person_message() {
    let err = GatewayError::DifferentPerson { confidence: 0.4123 };
    assert_eq!(
        err.to_string(),
        "Images do not appear to be the same person (confidence: 41.23%). Verification failed."
    );
}
