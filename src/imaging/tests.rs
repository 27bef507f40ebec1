use super::*;
use image::Rgb;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    RawImage::new(RgbImage::from_pixel(width, height, Rgb([120, 130, 140])))
        .to_png_bytes()
        .unwrap()
}

#[test]
fn test_decode_png() {
    let image = decode_image(&png_bytes(64, 48), &DecodeLimits::default()).unwrap();
    assert_eq!((image.width(), image.height()), (64, 48));
    assert_eq!(image.pixels().get_pixel(10, 10), &Rgb([120, 130, 140]));
}

#[test]
fn test_decode_rejects_empty_bytes() {
    assert!(matches!(
        decode_image(&[], &DecodeLimits::default()),
        Err(ImageError::Empty)
    ));
}

#[test]
fn test_decode_rejects_oversized_upload() {
    let bytes = png_bytes(32, 32);
    let limits = DecodeLimits {
        max_bytes: bytes.len() - 1,
        ..Default::default()
    };
    assert!(matches!(
        decode_image(&bytes, &limits),
        Err(ImageError::TooLarge { .. })
    ));
}

#[test]
fn test_decode_rejects_unsupported_formats() {
    let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
    assert!(matches!(
        decode_image(gif, &DecodeLimits::default()),
        Err(ImageError::UnsupportedFormat(_))
    ));

    assert!(matches!(
        decode_image(b"definitely not an image", &DecodeLimits::default()),
        Err(ImageError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_decode_rejects_truncated_png() {
    let bytes = png_bytes(32, 32);
    assert!(matches!(
        decode_image(&bytes[..40], &DecodeLimits::default()),
        Err(ImageError::Decode(_))
    ));
}

#[test]
fn test_decode_downscales_large_images() {
    let limits = DecodeLimits {
        max_dimension: 100,
        ..Default::default()
    };
    let image = decode_image(&png_bytes(400, 200), &limits).unwrap();
    assert_eq!((image.width(), image.height()), (100, 50));
}

#[test]
fn test_resize_to_fit_portrait() {
    let image = RawImage::new(RgbImage::new(300, 900)).resize_to_fit(300);
    assert_eq!((image.width(), image.height()), (100, 300));
}

#[test]
fn test_resize_to_fit_averages_source_area() {
    let stripes = RgbImage::from_fn(5760, 3, |x, _| {
        if x % 3 == 0 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });

    let image = RawImage::new(stripes).resize_to_fit(1920);

    assert_eq!((image.width(), image.height()), (1920, 1));
    assert!(
        image
            .pixels()
            .pixels()
            .all(|p| (83..=87).contains(&p.0[0]))
    );
}

#[test]
fn test_resize_to_fit_never_upscales() {
    let image = RawImage::new(RgbImage::new(50, 40)).resize_to_fit(1920);
    assert_eq!((image.width(), image.height()), (50, 40));
}

#[test]
fn test_empty_raw_image() {
    assert!(RawImage::new(RgbImage::new(0, 0)).is_empty());
    assert!(!RawImage::new(RgbImage::new(1, 1)).is_empty());
}
