//! Transcoder Core - image normalization library
//!
//! Decodes an uploaded image, bakes in its EXIF orientation, collapses its
//! color mode to 8-bit RGB or RGBA, resizes it to a fixed resolution and
//! re-encodes it as JPEG, PNG or WebP. Also holds the object key rules
//! (recursion guard, output key mapping) and the input size check.
//!
//! Nothing here touches storage or the environment; see the handler crate
//! for that.

pub mod decode;
pub mod encode;
pub mod keys;
pub mod limits;
pub mod pipeline;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use decode::{decode_image, ColorMode, DecodeError, DecodedImage, Orientation, SourceFormat};
pub use encode::{EncodeError, EncodedResult, OutputFormat, UnknownFormatError, JPEG_QUALITY};
pub use keys::{is_already_processed, map_key, normalize_prefix};
pub use limits::{validate_size, TooLargeError};
pub use pipeline::{FormatHint, PipelineConfig, PipelineError, SelectionRule, TranscodePipeline};
pub use transform::{FilterType, ResizeError};

/// Output width in pixels.
pub const TARGET_WIDTH: u32 = 256;

/// Output height in pixels.
pub const TARGET_HEIGHT: u32 = 256;

/// Key prefix output objects are written under.
pub const DEFAULT_PROCESSED_PREFIX: &str = "processed/";

/// Largest accepted input, 50 MiB.
pub const DEFAULT_MAX_INPUT_SIZE_BYTES: u64 = 50 * 1024 * 1024;
