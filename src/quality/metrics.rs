//! Sharpness and exposure metrics on 8-bit grayscale.

use image::{GrayImage, Luma, RgbImage};

/// Metrics computed for the soft checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetrics {
    /// Variance of the Laplacian on the histogram-equalized grayscale image.
    pub blur_score: f64,
    /// Mean grayscale intensity in `[0, 255]`.
    pub brightness: f64,
}

impl ImageMetrics {
    pub fn measure(image: &RgbImage) -> Self {
        let gray = to_grayscale(image);
        Self {
            blur_score: laplacian_variance(&equalize_histogram(&gray)),
            brightness: mean_intensity(&gray),
        }
    }
}

/// BT.601 luma: `0.299 R + 0.587 G + 0.114 B`, rounded.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Remaps intensities through the normalized cumulative histogram.
///
/// The lowest intensity present maps to 0 and the highest to 255. A single-valued
/// image is returned unchanged.
pub fn equalize_histogram(gray: &GrayImage) -> GrayImage {
    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return gray.clone();
    }

    let mut hist = [0u64; 256];
    for p in gray.pixels() {
        hist[p.0[0] as usize] += 1;
    }

    let Some(first) = hist.iter().position(|&h| h > 0) else {
        return gray.clone();
    };
    if hist[first] == total {
        return gray.clone();
    }

    let scale = 255.0 / (total - hist[first]) as f64;
    let mut lut = [0u8; 256];
    let mut sum = 0u64;
    for level in (first + 1)..256 {
        sum += hist[level];
        lut[level] = (sum as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }

    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = lut[p.0[0] as usize];
    }
    out
}

#[inline]
fn reflect101(i: i64, n: i64) -> u32 {
    if n == 1 {
        return 0;
    }
    let r = if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    r as u32
}

/// Population variance of the 4-neighbour Laplacian `[0,1,0; 1,-4,1; 0,1,0]`.
///
/// Every pixel contributes; borders use reflect-101. Returns 0 for an empty image.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (w, h) = (gray.width() as i64, gray.height() as i64);
    if w == 0 || h == 0 {
        return 0.0;
    }

    let at = |x: i64, y: i64| gray.get_pixel(reflect101(x, w), reflect101(y, h)).0[0] as f64;

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 0..h {
        for x in 0..w {
            let lap = at(x, y - 1) + at(x, y + 1) + at(x - 1, y) + at(x + 1, y) - 4.0 * at(x, y);
            sum += lap;
            sum_sq += lap * lap;
        }
    }

    let count = (w * h) as f64;
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}

fn mean_intensity(gray: &GrayImage) -> f64 {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return 0.0;
    }
    gray.pixels().map(|p| p.0[0] as u64).sum::<u64>() as f64 / count as f64
}

/// Sharpness score of an RGB image (higher is sharper).
pub fn blur_score(image: &RgbImage) -> f64 {
    laplacian_variance(&equalize_histogram(&to_grayscale(image)))
}

/// Mean grayscale brightness of an RGB image.
pub fn mean_brightness(image: &RgbImage) -> f64 {
    mean_intensity(&to_grayscale(image))
}
