//! Filesystem store: `<root>/YYYY/MM/DD/<uuid>.<ext>` plus `<uuid>.json`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ImageStore;
use super::error::StorageError;
use super::types::{ImageUpload, StoredImage};

const METADATA_EXTENSION: &str = "json";

const TEMP_SUFFIX: &str = ".tmp";

/// Picks the stored file extension (with leading dot).
///
/// Mimetype wins; otherwise a `.jpg`/`.jpeg`/`.png` filename suffix is kept;
/// anything else is stored as `.jpg`.
pub fn extension_for(mimetype: Option<&str>, filename: &str) -> &'static str {
    if let Some(mime) = mimetype {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("jpeg") || mime.contains("jpg") {
            return ".jpg";
        }
        if mime.contains("png") {
            return ".png";
        }
    }

    let suffix = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match suffix.as_deref() {
        Some("jpeg") => ".jpeg",
        Some("png") => ".png",
        _ => ".jpg",
    }
}

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if missing.
    pub fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))
    }

    fn day_dir(&self, at: DateTime<Utc>) -> PathBuf {
        self.root
            .join(at.year().to_string())
            .join(format!("{:02}", at.month()))
            .join(format!("{:02}", at.day()))
    }

    /// Path of the JSON record belonging to a stored image.
    pub fn metadata_path(image_path: &Path) -> PathBuf {
        image_path.with_extension(METADATA_EXTENSION)
    }

    /// Reads back the record written next to `image_path`.
    pub fn load_record(&self, image_path: &Path) -> Result<StoredImage, StorageError> {
        let path = Self::metadata_path(image_path);
        let bytes = fs::read(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Stores `upload` as if verified at `at`.
    pub fn save_at(
        &self,
        upload: &ImageUpload,
        user_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<StoredImage, StorageError> {
        if upload.bytes.is_empty() {
            return Err(StorageError::EmptyUpload {
                filename: upload.filename.clone(),
            });
        }

        let dir = self.day_dir(at);
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

        let id = Uuid::new_v4();
        let ext = extension_for(upload.mimetype.as_deref(), &upload.filename);
        let image_path = dir.join(format!("{}{}", id.simple(), ext));

        write_atomic(&image_path, &upload.bytes)?;

        let record = StoredImage {
            id,
            storage_path: image_path.clone(),
            original_filename: upload.filename.clone(),
            mimetype: upload.mimetype.clone(),
            size_bytes: upload.bytes.len() as u64,
            content_hash: blake3::hash(&upload.bytes).to_hex().to_string(),
            user_id: user_id.map(str::to_string),
            verified: true,
            verified_at: at,
        };

        let written = serde_json::to_vec_pretty(&record)
            .map_err(StorageError::from)
            .and_then(|json| write_atomic(&Self::metadata_path(&image_path), &json));
        if let Err(e) = written {
            remove_quietly(&image_path);
            return Err(e);
        }

        debug!(
            id = %record.id,
            path = %image_path.display(),
            size_bytes = record.size_bytes,
            "Stored verified image"
        );

        Ok(record)
    }

    /// Deletes a stored image and its record.
    fn discard(record: &StoredImage) {
        remove_quietly(&record.storage_path);
        remove_quietly(&Self::metadata_path(&record.storage_path));
    }
}

impl ImageStore for LocalImageStore {
    fn save(
        &self,
        upload: &ImageUpload,
        user_id: Option<&str>,
    ) -> Result<StoredImage, StorageError> {
        self.save_at(upload, user_id, Utc::now())
    }

    fn save_batch(
        &self,
        uploads: &[ImageUpload],
        user_id: Option<&str>,
    ) -> Result<Vec<StoredImage>, StorageError> {
        let at = Utc::now();
        let mut records = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.save_at(upload, user_id, at) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        filename = %upload.filename,
                        rolled_back = records.len(),
                        error = %e,
                        "Batch store failed, removing images already written"
                    );
                    records.iter().for_each(Self::discard);
                    return Err(e);
                }
            }
        }

        info!(count = records.len(), user_id = ?user_id, "Stored verified batch");
        Ok(records)
    }
}

/// Writes to `<path>.tmp`, syncs, then renames into place.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);

    let mut file = File::create(&temp).map_err(|e| StorageError::io(&temp, e))?;
    let synced = file.write_all(bytes).and_then(|()| file.sync_all());
    drop(file);
    if let Err(e) = synced {
        remove_quietly(&temp);
        return Err(StorageError::io(&temp, e));
    }

    fs::rename(&temp, path).map_err(|e| {
        remove_quietly(&temp);
        StorageError::io(path, e)
    })
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
    }
}
