use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uploaded file as received by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mimetype: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, mimetype: Option<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            mimetype,
        }
    }
}

/// Record of a verified image written to the store.
///
/// Serialized as the `<id>.json` sidecar next to the image file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    pub id: Uuid,
    pub storage_path: PathBuf,
    pub original_filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    pub size_bytes: u64,
    /// blake3 of the stored bytes, hex encoded.
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub verified: bool,
    pub verified_at: DateTime<Utc>,
}
