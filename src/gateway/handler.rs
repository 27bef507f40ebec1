use axum::{
    Json,
    extract::{Multipart, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::decision::{SimilarityAnalysis, VerificationResult};
use crate::gateway::error::GatewayError;
use crate::gateway::state::AppState;
use crate::imaging::{DecodeLimits, RawImage, decode_image};
use crate::pipeline::{IMAGE_NAMES, ImageAnalysis, VerificationOutcome};
use crate::similarity::PairwiseScores;
use crate::storage::{ImageUpload, StoredImage};

pub const API_KEY_HEADER: &str = "X-API-Key";

const USER_ID_FIELD: &str = "user_id";

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub result: VerificationResult,
    pub confidence: f32,
    pub similarity: PairwiseScores,
    pub analysis: SimilarityAnalysis,
    pub image_analyses: Vec<ImageAnalysis>,
    pub message: String,
}

impl From<VerificationOutcome> for VerificationResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        Self {
            result: outcome.verdict.result,
            confidence: outcome.verdict.confidence,
            similarity: outcome.similarity,
            analysis: outcome.verdict.analysis,
            message: outcome.verdict.message(),
            image_analyses: outcome.image_analyses,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyAndStoreResponse {
    pub result: VerificationResult,
    pub confidence: f32,
    pub similarity: PairwiseScores,
    pub message: String,
    pub stored_images: Vec<StoredImage>,
    pub image_analyses: Vec<ImageAnalysis>,
}

/// Parsed multipart form: the three uploads in `image1..image3` order.
#[derive(Debug)]
pub struct VerifyForm {
    pub uploads: [ImageUpload; 3],
    pub user_id: Option<String>,
}

/// Rejects the request when an API key is configured and the header does not match.
pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), GatewayError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    if provided == Some(expected) {
        Ok(())
    } else {
        warn!("Rejected request with invalid or missing API key");
        Err(GatewayError::Unauthorized)
    }
}

/// Reads `image1`, `image2`, `image3` and the optional `user_id` field.
///
/// Unknown fields are ignored. A repeated field keeps its last value.
pub async fn read_form(mut multipart: Multipart) -> Result<VerifyForm, GatewayError> {
    let mut slots: [Option<ImageUpload>; 3] = [None, None, None];
    let mut user_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == USER_ID_FIELD {
            let text = field
                .text()
                .await
                .map_err(|e| GatewayError::InvalidRequest(format!("Invalid user_id: {}", e)))?;
            let text = text.trim();
            user_id = (!text.is_empty()).then(|| text.to_string());
            continue;
        }

        let Some(index) = IMAGE_NAMES.iter().position(|n| *n == name) else {
            debug!(field = %name, "Ignoring unknown form field");
            continue;
        };

        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.jpg", name));
        let mimetype = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            GatewayError::InvalidRequest(format!("Failed to read {}: {}", name, e))
        })?;

        slots[index] = Some(ImageUpload::new(bytes.to_vec(), filename, mimetype));
    }

    let [a, b, c] = slots;
    let uploads = match (a, b, c) {
        (Some(a), Some(b), Some(c)) => [a, b, c],
        (a, b, _) => {
            let missing = if a.is_none() {
                IMAGE_NAMES[0]
            } else if b.is_none() {
                IMAGE_NAMES[1]
            } else {
                IMAGE_NAMES[2]
            };
            return Err(GatewayError::InvalidRequest(format!(
                "Missing file field '{}'",
                missing
            )));
        }
    };

    Ok(VerifyForm { uploads, user_id })
}

/// Decodes the three uploads on the blocking pool.
///
/// The uploads are handed back so their bytes can be stored afterwards.
pub async fn decode_uploads(
    uploads: [ImageUpload; 3],
    limits: DecodeLimits,
) -> Result<([RawImage; 3], [ImageUpload; 3]), GatewayError> {
    tokio::task::spawn_blocking(move || -> Result<_, GatewayError> {
        let mut images = Vec::with_capacity(uploads.len());
        for (name, upload) in IMAGE_NAMES.iter().zip(&uploads) {
            let image =
                decode_image(&upload.bytes, &limits).map_err(|source| GatewayError::InvalidImage {
                    image: name.to_string(),
                    source,
                })?;
            images.push(image);
        }
        let images: [RawImage; 3] = images
            .try_into()
            .map_err(|_| GatewayError::Internal("decoded image count mismatch".to_string()))?;
        Ok((images, uploads))
    })
    .await
    .map_err(|e| GatewayError::Internal(format!("decode task failed: {}", e)))?
}

#[instrument(skip(state, headers, multipart))]
pub async fn verify_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<VerificationResponse>, GatewayError> {
    authorize(&state, &headers)?;

    let form = read_form(multipart).await?;
    let (images, _) = decode_uploads(form.uploads, state.decode_limits).await?;

    let outcome = state.pipeline.verify(images).await?;

    Ok(Json(VerificationResponse::from(outcome)))
}

#[instrument(skip(state, headers, multipart), fields(user_id = tracing::field::Empty))]
pub async fn verify_and_store_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<VerifyAndStoreResponse>, GatewayError> {
    authorize(&state, &headers)?;

    let VerifyForm { uploads, user_id } = read_form(multipart).await?;
    if let Some(ref id) = user_id {
        tracing::Span::current().record("user_id", tracing::field::display(id));
    }

    let (images, uploads) = decode_uploads(uploads, state.decode_limits).await?;
    let outcome = state.pipeline.verify(images).await?;

    if !outcome.verdict.is_same_person() {
        info!(
            confidence = outcome.verdict.confidence,
            "Verification failed, images not stored"
        );
        return Err(GatewayError::DifferentPerson {
            confidence: outcome.verdict.confidence,
        });
    }

    let store = state.store.clone();
    let stored_images = tokio::task::spawn_blocking(move || {
        store.save_batch(&uploads, user_id.as_deref())
    })
    .await
    .map_err(|e| GatewayError::Internal(format!("storage task failed: {}", e)))??;

    info!(count = stored_images.len(), "Verified images stored");

    Ok(Json(VerifyAndStoreResponse {
        result: outcome.verdict.result,
        confidence: outcome.verdict.confidence,
        similarity: outcome.similarity,
        message: "All 3 images verified as same person and stored successfully.".to_string(),
        stored_images,
        image_analyses: outcome.image_analyses,
    }))
}
