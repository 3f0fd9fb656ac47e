//! The transcode pipeline.
//!
//! Takes a decoded image through five stages, in order and none optional:
//!
//! 1. output format selection
//! 2. orientation normalization
//! 3. color-mode normalization
//! 4. exact resize
//! 5. transparency-aware encode

mod format;

pub use format::{decide_output_format, select_output_format, FormatHint, SelectionRule};

use thiserror::Error;

use crate::decode::DecodedImage;
use crate::encode::{encode, EncodeError, EncodedResult, OutputFormat};
use crate::transform::{normalize_color_mode, normalize_orientation, resize_exact, FilterType, ResizeError};
use crate::{TARGET_HEIGHT, TARGET_WIDTH};

/// Errors from the stages after decode.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resize(#[from] ResizeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Fixed pipeline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub target_width: u32,
    pub target_height: u32,
    /// Used when neither the source hint nor alpha decide the format.
    pub default_format: OutputFormat,
    pub filter: FilterType,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_width: TARGET_WIDTH,
            target_height: TARGET_HEIGHT,
            default_format: OutputFormat::Jpeg,
            filter: FilterType::Lanczos3,
        }
    }
}

/// Runs decoded images through the transcode stages.
#[derive(Debug, Clone, Default)]
pub struct TranscodePipeline {
    config: PipelineConfig,
}

impl TranscodePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Transcode one image.
    ///
    /// The output format is chosen from the image as decoded, before any
    /// normalization touches its color mode.
    pub fn run(&self, image: DecodedImage) -> Result<EncodedResult, PipelineError> {
        let hint = FormatHint::from_source(image.source_format.as_ref());
        let format = select_output_format(&hint, &image, self.config.default_format);

        let image = normalize_orientation(image);
        let image = normalize_color_mode(image);
        let image = resize_exact(
            image,
            self.config.target_width,
            self.config.target_height,
            self.config.filter,
        )?;

        Ok(encode(&image, format)?)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Property: JPEG output never carries alpha, whatever the input alpha.
        #[test]
        fn prop_jpeg_never_has_alpha(w in 1u32..=24, h in 1u32..=24, alpha in any::<u8>()) {
            let rgba = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, alpha]));
            let image = DecodedImage::new(DynamicImage::ImageRgba8(rgba), Some(crate::SourceFormat::Jpeg));

            let pipeline = TranscodePipeline::new(PipelineConfig {
                target_width: 16,
                target_height: 16,
                ..PipelineConfig::default()
            });
            let result = pipeline.run(image).unwrap();

            let out = image::load_from_memory(&result.bytes).unwrap();
            prop_assert!(!out.color().has_alpha());
            prop_assert_eq!((out.width(), out.height()), (16, 16));
        }
    }
}
