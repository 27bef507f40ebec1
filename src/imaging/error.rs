use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image is empty")]
    Empty,

    #[error("image size {size} bytes exceeds limit of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported image format: {0} (use JPEG or PNG)")]
    UnsupportedFormat(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("failed to encode image: {0}")]
    Encode(String),
}
