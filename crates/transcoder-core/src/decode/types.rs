//! Core types for image decoding.

use image::{ColorType, DynamicImage, ImageFormat};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input buffer is empty.
    #[error("Empty input")]
    Empty,

    /// The byte stream does not match any enabled image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Pixel layout reported by the decoder.
///
/// 16-bit and floating point variants fold into their 8-bit counterparts; the
/// pipeline only cares whether the mode carries color and alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Three color channels.
    Rgb,
    /// Three color channels plus alpha.
    Rgba,
    /// Single luminance channel.
    Grayscale,
    /// Luminance plus alpha.
    GrayscaleAlpha,
    /// Indexed color without a transparency entry.
    Palette,
    /// Indexed color with at least one transparent palette entry.
    PaletteWithTransparency,
}

impl ColorMode {
    /// Returns true if pixels in this mode carry transparency information.
    pub fn has_alpha(self) -> bool {
        match self {
            ColorMode::Rgba | ColorMode::GrayscaleAlpha | ColorMode::PaletteWithTransparency => {
                true
            }
            ColorMode::Rgb | ColorMode::Grayscale | ColorMode::Palette => false,
        }
    }

    /// Derive the mode from the decoded buffer's color type.
    pub fn from_color_type(color: ColorType) -> Self {
        match (color.has_color(), color.has_alpha()) {
            (true, true) => ColorMode::Rgba,
            (true, false) => ColorMode::Rgb,
            (false, true) => ColorMode::GrayscaleAlpha,
            (false, false) => ColorMode::Grayscale,
        }
    }
}

/// Container format the decoder detected.
///
/// Only used as a hint when choosing the output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
    /// Any other decodable format, by lowercase name (e.g. `"bmp"`).
    Other(String),
}

impl SourceFormat {
    /// Map the `image` crate's format tag.
    pub fn from_image_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => SourceFormat::Jpeg,
            ImageFormat::Png => SourceFormat::Png,
            ImageFormat::WebP => SourceFormat::WebP,
            other => SourceFormat::Other(
                other
                    .extensions_str()
                    .first()
                    .map(|ext| ext.to_string())
                    .unwrap_or_else(|| format!("{other:?}").to_lowercase()),
            ),
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A fully materialized image plus what the decoder learned about it.
///
/// Pipeline stages take the value by ownership and hand back a new one, so a
/// single request never shares pixel data with anything else.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixel data.
    pub pixels: DynamicImage,
    /// Pixel layout as reported by the decoder, updated by normalization.
    pub color_mode: ColorMode,
    /// Detected container format, if any.
    pub source_format: Option<SourceFormat>,
    /// Orientation still to be applied to `pixels`.
    pub orientation: Orientation,
}

impl DecodedImage {
    /// Wrap an in-memory image. The color mode is derived from its buffer type.
    pub fn new(pixels: DynamicImage, source_format: Option<SourceFormat>) -> Self {
        let color_mode = ColorMode::from_color_type(pixels.color());
        Self {
            pixels,
            color_mode,
            source_format,
            orientation: Orientation::Normal,
        }
    }

    /// Override the reported color mode.
    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    /// Set the orientation still to be applied.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}
