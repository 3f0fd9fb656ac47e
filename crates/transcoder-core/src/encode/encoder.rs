//! Transparency-aware encoding to the selected output format.
//!
//! JPEG cannot store alpha, so RGBA buffers are flattened onto white before
//! they reach the JPEG encoder. PNG and WebP encode the buffer as-is.

use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};
use jpeg_encoder::{ColorType as JpegColorType, Encoder as JpegEncoder};
use thiserror::Error;

use super::composite::{flatten, WHITE};
use super::format::OutputFormat;
use crate::decode::DecodedImage;

/// Quality used for every JPEG this crate writes.
pub const JPEG_QUALITY: u8 = 85;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The pixel buffer is not 8-bit RGB or RGBA
    #[error("Cannot encode {color:?} pixels as {format}")]
    UnsupportedMode {
        color: image::ColorType,
        format: OutputFormat,
    },

    /// The underlying encoder rejected the image
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Fixed encoder parameters for one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderSettings {
    /// Baseline JPEG; `optimize` builds Huffman tables from the image
    /// instead of using the standard ones.
    Jpeg { quality: u8, optimize: bool },
    Png {
        compression: CompressionType,
        filter: PngFilterType,
    },
    /// The `image` crate only ships a lossless WebP encoder.
    WebP,
}

impl EncoderSettings {
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jpeg => EncoderSettings::Jpeg {
                quality: JPEG_QUALITY,
                optimize: true,
            },
            OutputFormat::Png => EncoderSettings::Png {
                compression: CompressionType::Best,
                filter: PngFilterType::Adaptive,
            },
            OutputFormat::WebP => EncoderSettings::WebP,
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            EncoderSettings::Jpeg { .. } => OutputFormat::Jpeg,
            EncoderSettings::Png { .. } => OutputFormat::Png,
            EncoderSettings::WebP => OutputFormat::WebP,
        }
    }
}

/// Encoded bytes plus the format they are in.
#[derive(Debug, Clone)]
pub struct EncodedResult {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub content_type: &'static str,
}

/// Encode an image with the fixed settings for `format`.
///
/// The image is expected to be 8-bit RGB or RGBA (see
/// [`normalize_color_mode`](crate::transform::normalize_color_mode)).
///
/// # Errors
///
/// Returns `EncodeError::UnsupportedMode` for any other pixel layout and
/// `EncodeError::EncodingFailed` when the codec itself fails.
pub fn encode(image: &DecodedImage, format: OutputFormat) -> Result<EncodedResult, EncodeError> {
    let settings = EncoderSettings::for_format(format);
    let bytes = encode_with(&image.pixels, settings)?;

    log::debug!(
        "Encoded {}x{} image as {} ({} bytes)",
        image.width(),
        image.height(),
        format,
        bytes.len()
    );

    Ok(EncodedResult {
        bytes,
        format,
        content_type: format.content_type(),
    })
}

/// Encode a pixel buffer with explicit settings.
pub fn encode_with(pixels: &DynamicImage, settings: EncoderSettings) -> Result<Vec<u8>, EncodeError> {
    let format = settings.format();
    let unsupported = || EncodeError::UnsupportedMode {
        color: pixels.color(),
        format,
    };

    let mut buffer = Cursor::new(Vec::new());

    let result = match settings {
        EncoderSettings::Jpeg { quality, optimize } => {
            let rgb = match pixels {
                DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
                DynamicImage::ImageRgba8(rgba) => Cow::Owned(flatten(rgba, WHITE)),
                _ => return Err(unsupported()),
            };
            return encode_jpeg(&rgb, quality, optimize).map_err(|message| {
                EncodeError::EncodingFailed { format, message }
            });
        }
        EncoderSettings::Png {
            compression,
            filter,
        } => {
            let color = layout(pixels).ok_or_else(unsupported)?;
            PngEncoder::new_with_quality(&mut buffer, compression, filter).write_image(
                pixels.as_bytes(),
                pixels.width(),
                pixels.height(),
                color,
            )
        }
        EncoderSettings::WebP => {
            let color = layout(pixels).ok_or_else(unsupported)?;
            WebPEncoder::new_lossless(&mut buffer).write_image(
                pixels.as_bytes(),
                pixels.width(),
                pixels.height(),
                color,
            )
        }
    };

    result.map_err(|e| EncodeError::EncodingFailed {
        format,
        message: e.to_string(),
    })?;

    Ok(buffer.into_inner())
}

fn encode_jpeg(rgb: &RgbImage, quality: u8, optimize: bool) -> Result<Vec<u8>, String> {
    let too_large = |_| format!("{}x{} exceeds the JPEG size limit", rgb.width(), rgb.height());
    let width = u16::try_from(rgb.width()).map_err(too_large)?;
    let height = u16::try_from(rgb.height()).map_err(too_large)?;

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new(&mut bytes, quality);
    encoder.set_optimized_huffman_tables(optimize);
    encoder
        .encode(rgb.as_raw(), width, height, JpegColorType::Rgb)
        .map_err(|e| e.to_string())?;
    Ok(bytes)
}

fn layout(pixels: &DynamicImage) -> Option<ExtendedColorType> {
    match pixels {
        DynamicImage::ImageRgb8(_) => Some(ExtendedColorType::Rgb8),
        DynamicImage::ImageRgba8(_) => Some(ExtendedColorType::Rgba8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn rgb_image(width: u32, height: u32) -> DecodedImage {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 90]));
        DecodedImage::new(DynamicImage::ImageRgb8(img), None)
    }

    fn rgba_image(width: u32, height: u32, alpha: u8) -> DecodedImage {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, alpha]));
        DecodedImage::new(DynamicImage::ImageRgba8(img), None)
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let result = encode(&rgb_image(32, 32), OutputFormat::Jpeg).unwrap();

        assert_eq!(result.format, OutputFormat::Jpeg);
        assert_eq!(result.content_type, "image/jpeg");
        // SOI ... EOI
        assert_eq!(&result.bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&result.bytes[result.bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_flattens_alpha_onto_white() {
        let result = encode(&rgba_image(16, 16, 0), OutputFormat::Jpeg).unwrap();

        let decoded = image::load_from_memory_with_format(&result.bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);

        let [r, g, b] = decoded.to_rgb8().get_pixel(8, 8).0;
        // Lossy, but a fully transparent black image must come out near white
        assert!(r > 245 && g > 245 && b > 245, "got {:?}", (r, g, b));
    }

    #[test]
    fn test_encode_png_keeps_alpha() {
        let result = encode(&rgba_image(8, 8, 100), OutputFormat::Png).unwrap();

        assert_eq!(result.content_type, "image/png");
        let decoded = image::load_from_memory_with_format(&result.bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgba8);
        assert_eq!(decoded.to_rgba8().get_pixel(3, 3).0, [0, 0, 0, 100]);
    }

    #[test]
    fn test_encode_png_rgb_is_lossless() {
        let image = rgb_image(12, 9);
        let result = encode(&image, OutputFormat::Png).unwrap();

        let decoded = image::load_from_memory_with_format(&result.bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgb8(), image.pixels.to_rgb8());
    }

    #[test]
    fn test_encode_webp_roundtrip_is_lossless() {
        let image = rgba_image(10, 10, 200);
        let result = encode(&image, OutputFormat::WebP).unwrap();

        assert_eq!(result.content_type, "image/webp");
        let decoded = image::load_from_memory_with_format(&result.bytes, ImageFormat::WebP).unwrap();
        assert_eq!(decoded.to_rgba8(), image.pixels.to_rgba8());
    }

    #[test]
    fn test_optimized_huffman_tables_shrink_output() {
        let image = rgb_image(64, 64);
        let plain = encode_with(
            &image.pixels,
            EncoderSettings::Jpeg {
                quality: JPEG_QUALITY,
                optimize: false,
            },
        )
        .unwrap();
        let optimized = encode_with(&image.pixels, EncoderSettings::for_format(OutputFormat::Jpeg)).unwrap();

        assert!(
            optimized.len() < plain.len(),
            "optimized {} bytes, plain {} bytes",
            optimized.len(),
            plain.len()
        );
        let decoded = image::load_from_memory_with_format(&optimized, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 64));
    }

    #[test]
    fn test_encode_jpeg_rejects_oversized_dimensions() {
        let wide = DynamicImage::new_rgb8(u32::from(u16::MAX) + 1, 1);
        let result = encode_with(&wide, EncoderSettings::for_format(OutputFormat::Jpeg));
        assert!(matches!(result, Err(EncodeError::EncodingFailed { .. })));
    }

    #[test]
    fn test_encode_rejects_unnormalized_buffer() {
        let gray = DecodedImage::new(DynamicImage::new_luma8(4, 4), None);

        for format in OutputFormat::ALL {
            let result = encode(&gray, format);
            assert!(
                matches!(result, Err(EncodeError::UnsupportedMode { .. })),
                "{format} accepted a grayscale buffer"
            );
        }
    }

    #[test]
    fn test_settings_are_fixed_per_format() {
        assert_eq!(
            EncoderSettings::for_format(OutputFormat::Jpeg),
            EncoderSettings::Jpeg {
                quality: 85,
                optimize: true,
            }
        );
        assert_eq!(
            EncoderSettings::for_format(OutputFormat::Png),
            EncoderSettings::Png {
                compression: CompressionType::Best,
                filter: PngFilterType::Adaptive,
            }
        );
        for format in OutputFormat::ALL {
            assert_eq!(EncoderSettings::for_format(format).format(), format);
        }
    }
}
