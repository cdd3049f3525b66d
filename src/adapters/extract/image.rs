//! Image sizing for the OCR collaborator
//!
//! The OCR service rejects payloads above a byte ceiling. Oversized images
//! are resized once: both dimensions scale by `sqrt(ceiling / current)`,
//! which preserves aspect ratio and approximates the byte budget because
//! compressed size roughly tracks pixel area. Single pass, no iterative
//! retry.

use crate::domain::errors::ItemError;
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;

/// Linear scale factor that brings `current` bytes down to `ceiling`
pub fn resize_factor(current: usize, ceiling: usize) -> f64 {
    (ceiling as f64 / current as f64).sqrt()
}

/// Shrink an encoded image below the byte ceiling
///
/// Images already at or under the ceiling are returned unchanged. Oversized
/// images are decoded, scaled by [`resize_factor`], and re-encoded as JPEG
/// exactly once.
pub fn shrink_to_ceiling(bytes: &[u8], ceiling: usize) -> Result<Vec<u8>, ItemError> {
    if bytes.len() <= ceiling {
        return Ok(bytes.to_vec());
    }

    let factor = resize_factor(bytes.len(), ceiling);

    let img = image::load_from_memory(bytes)
        .map_err(|e| ItemError::Image(format!("decode failed: {e}")))?;

    let new_width = ((f64::from(img.width()) * factor).floor() as u32).max(1);
    let new_height = ((f64::from(img.height()) * factor).floor() as u32).max(1);

    tracing::debug!(
        original_bytes = bytes.len(),
        ceiling,
        factor,
        new_width,
        new_height,
        "Resizing oversized image"
    );

    let resized = img.resize_exact(new_width, new_height, FilterType::Triangle);

    let mut out = Vec::new();
    resized
        .to_rgb8()
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .map_err(|e| ItemError::Image(format!("re-encode failed: {e}")))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_factor_is_sqrt_of_ratio() {
        let factor = resize_factor(1_600_000, 400_000);
        assert!((factor - 0.5).abs() < 1e-9);

        let factor = resize_factor(838_860 * 4, 838_860);
        assert!((factor - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_under_ceiling_returns_bytes_unchanged() {
        let bytes = vec![1u8, 2, 3, 4];
        let out = shrink_to_ceiling(&bytes, 1024).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_garbage_over_ceiling_is_image_error() {
        let bytes = vec![0u8; 2048];
        let result = shrink_to_ceiling(&bytes, 1024);
        assert!(matches!(result, Err(ItemError::Image(_))));
    }

    #[test]
    fn test_oversized_image_is_shrunk_in_one_pass() {
        use rand::Rng;

        // Noise compresses poorly, so a small PNG easily exceeds the ceiling.
        let mut rng = rand::thread_rng();
        let img = image::RgbImage::from_fn(120, 80, |_, _| image::Rgb(rng.gen::<[u8; 3]>()));

        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let ceiling = png.len() / 4;
        let out = shrink_to_ceiling(&png, ceiling).unwrap();

        let shrunk = image::load_from_memory(&out).unwrap();
        assert!(shrunk.width() < 120);
        assert!(shrunk.height() < 80);

        // Dimensions follow the sqrt factor.
        let factor = resize_factor(png.len(), ceiling);
        assert_eq!(shrunk.width(), ((120.0 * factor).floor() as u32).max(1));
        assert_eq!(shrunk.height(), ((80.0 * factor).floor() as u32).max(1));
    }
}
