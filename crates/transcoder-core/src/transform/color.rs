//! Color-mode normalization.
//!
//! Collapses every decoder-reported mode into 8-bit RGB or RGBA, so later
//! stages never see palette, grayscale or 16-bit data.

use image::DynamicImage;

use crate::decode::{ColorMode, DecodedImage};

/// The mode an image is normalized to: RGBA when the source carries alpha,
/// RGB otherwise.
pub fn canonical_mode(mode: ColorMode) -> ColorMode {
    match mode {
        ColorMode::Rgba | ColorMode::GrayscaleAlpha | ColorMode::PaletteWithTransparency => {
            ColorMode::Rgba
        }
        ColorMode::Rgb | ColorMode::Grayscale | ColorMode::Palette => ColorMode::Rgb,
    }
}

/// Convert the pixel buffer to the canonical mode for its color mode.
pub fn normalize_color_mode(image: DecodedImage) -> DecodedImage {
    let target = canonical_mode(image.color_mode);

    let pixels = match target {
        ColorMode::Rgba => DynamicImage::ImageRgba8(image.pixels.into_rgba8()),
        _ => DynamicImage::ImageRgb8(image.pixels.into_rgb8()),
    };

    DecodedImage {
        pixels,
        color_mode: target,
        ..image
    }
}
