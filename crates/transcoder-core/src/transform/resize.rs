//! Exact-size resizing.
//!
//! The output always has exactly the requested dimensions; aspect ratio is
//! not preserved.

use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur while resizing.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Width or height is zero
    #[error("Invalid target dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The source has no pixels
    #[error("Cannot resize an empty {width}x{height} image")]
    EmptySource { width: u32, height: u32 },
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `ResizeError::InvalidDimensions` if either target dimension is zero
/// and `ResizeError::EmptySource` if the source has no pixels.
pub fn resize_exact(
    image: DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::InvalidDimensions { width, height });
    }

    if image.width() == 0 || image.height() == 0 {
        return Err(ResizeError::EmptySource {
            width: image.width(),
            height: image.height(),
        });
    }

    // Fast path: if dimensions match, nothing to do
    if image.width() == width && image.height() == height {
        return Ok(image);
    }

    let pixels = image
        .pixels
        .resize_exact(width, height, filter.to_image_filter());

    Ok(DecodedImage { pixels, ..image })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        // Simple gradient image for testing
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                128,
            ])
        });
        DecodedImage::new(DynamicImage::ImageRgb8(img), None)
    }

    #[test]
    fn test_resize_downscale() {
        let resized = resize_exact(create_test_image(100, 50), 50, 25, FilterType::Lanczos3).unwrap();

        assert_eq!((resized.width(), resized.height()), (50, 25));
        assert_eq!(resized.pixels.as_bytes().len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_ignores_aspect_ratio() {
        let resized = resize_exact(create_test_image(300, 40), 256, 256, FilterType::Lanczos3).unwrap();
        assert_eq!((resized.width(), resized.height()), (256, 256));
    }

    #[test]
    fn test_resize_upscale() {
        let resized = resize_exact(create_test_image(16, 8), 256, 256, FilterType::Lanczos3).unwrap();
        assert_eq!((resized.width(), resized.height()), (256, 256));
    }

    #[test]
    fn test_resize_same_dimensions() {
        let resized = resize_exact(create_test_image(100, 50), 100, 50, FilterType::Bilinear).unwrap();
        assert_eq!((resized.width(), resized.height()), (100, 50));
    }

    #[test]
    fn test_resize_keeps_alpha_mode() {
        let rgba = RgbaImage::from_pixel(10, 10, Rgba([5, 5, 5, 77]));
        let image = DecodedImage::new(DynamicImage::ImageRgba8(rgba), None);

        let resized = resize_exact(image, 20, 20, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.pixels.color(), image::ColorType::Rgba8);
        assert_eq!(resized.pixels.to_rgba8().get_pixel(10, 10).0[3], 77);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let result = resize_exact(create_test_image(100, 50), 0, 50, FilterType::Bilinear);
        assert!(matches!(result, Err(ResizeError::InvalidDimensions { .. })));

        let result = resize_exact(create_test_image(100, 50), 50, 0, FilterType::Bilinear);
        assert!(matches!(result, Err(ResizeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_resize_empty_source_error() {
        let image = DecodedImage::new(DynamicImage::new_rgb8(0, 0), None);
        let result = resize_exact(image, 10, 10, FilterType::Bilinear);
        assert!(matches!(result, Err(ResizeError::EmptySource { .. })));
    }

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_all_filter_types() {
        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = resize_exact(create_test_image(100, 50), 50, 25, filter).unwrap();
            assert_eq!((resized.width(), resized.height()), (50, 25));
        }
    }
}
