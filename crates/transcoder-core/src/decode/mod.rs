//! Image decoding for the transcoder.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, WebP, BMP, GIF and TIFF input, detected by content
//! - Reading the EXIF orientation tag so the pipeline can normalize it
//! - Reporting the color mode the source was stored in, including indexed
//!   color that the decoder expands away
//!
//! Decoding always fully materializes the pixel buffer. A truncated or
//! malformed stream fails here and never later in the pipeline.

mod jpeg;
mod png;
mod reader;
mod types;

pub use reader::decode_image;
pub use types::{ColorMode, DecodeError, DecodedImage, Orientation, SourceFormat};
