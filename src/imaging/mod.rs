//! Image decoding and the pixel buffer handed to the quality gate and detector.

mod error;

#[cfg(test)]
mod tests;

pub use error::ImageError;

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::constants::{DEFAULT_MAX_IMAGE_DIMENSION, DEFAULT_MAX_IMAGE_SIZE_MB};

/// Decoded RGB8 image. Clones share the pixel buffer.
#[derive(Debug, Clone)]
pub struct RawImage {
    pixels: Arc<RgbImage>,
}

impl RawImage {
    pub fn new(pixels: RgbImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `true` if the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Downscales so the longer side is at most `max_dimension`, keeping aspect ratio.
    ///
    /// Pixels are area-averaged. Images already within bounds are returned as-is
    /// (no upscaling).
    pub fn resize_to_fit(self, max_dimension: u32) -> Self {
        let (width, height) = (self.width(), self.height());
        if max_dimension == 0 || width.max(height) <= max_dimension {
            return self;
        }

        let (new_width, new_height) = if height > width {
            let scaled = (width as u64 * max_dimension as u64 / height as u64) as u32;
            (scaled.max(1), max_dimension)
        } else {
            let scaled = (height as u64 * max_dimension as u64 / width as u64) as u32;
            (max_dimension, scaled.max(1))
        };

        debug!(
            from_width = width,
            from_height = height,
            to_width = new_width,
            to_height = new_height,
            "Resizing image"
        );

        Self::new(image::imageops::thumbnail(
            self.pixels.as_ref(),
            new_width,
            new_height,
        ))
    }

    /// Lossless PNG encoding of the pixel buffer.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ImageError> {
        let mut buf = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

/// Limits applied by [`decode_image`].
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    pub max_bytes: usize,
    pub max_dimension: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_bytes: (DEFAULT_MAX_IMAGE_SIZE_MB * 1024 * 1024) as usize,
            max_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
        }
    }
}

/// Sniffs the container format, accepting only JPEG and PNG.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    let format =
        image::guess_format(bytes).map_err(|e| ImageError::UnsupportedFormat(e.to_string()))?;
    match format {
        ImageFormat::Jpeg | ImageFormat::Png => Ok(format),
        other => Err(ImageError::UnsupportedFormat(format!("{:?}", other))),
    }
}

/// Decodes uploaded bytes into an RGB image, then downscales to `max_dimension`.
pub fn decode_image(bytes: &[u8], limits: &DecodeLimits) -> Result<RawImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    if bytes.len() > limits.max_bytes {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            max: limits.max_bytes,
        });
    }

    let format = detect_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let image = RawImage::new(decoded.to_rgb8());
    if image.is_empty() {
        return Err(ImageError::ZeroDimensions);
    }

    Ok(image.resize_to_fit(limits.max_dimension))
}
