//! Persistence of verified uploads.
//!
//! Only images that passed a `SAME_PERSON` verification reach the store. Each image
//! is written under a date-partitioned directory together with a JSON record.

pub mod error;
pub mod local;
mod types;


pub use error::StorageError;
pub use local::{LocalImageStore, extension_for};
pub use types::{ImageUpload, StoredImage};

/// Writes verified images and returns their records.
pub trait ImageStore: Send + Sync {
    /// Stores a single upload.
    fn save(&self, upload: &ImageUpload, user_id: Option<&str>)
    -> Result<StoredImage, StorageError>;

    /// Stores `uploads` in order, stopping at the first failure.
    ///
    /// Implementations should not leave earlier uploads behind when a later one fails.
    fn save_batch(
        &self,
        uploads: &[ImageUpload],
        user_id: Option<&str>,
    ) -> Result<Vec<StoredImage>, StorageError> {
        uploads
            .iter()
            .map(|upload| self.save(upload, user_id))
            .collect()
    }
}
