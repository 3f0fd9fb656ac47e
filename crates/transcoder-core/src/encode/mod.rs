//! Image encoding for the transcoded output.
//!
//! Supports JPEG (with alpha flattened onto white), PNG and lossless WebP.

mod composite;
mod encoder;
mod format;

pub use composite::{flatten, WHITE};
pub use encoder::{encode, encode_with, EncodeError, EncodedResult, EncoderSettings, JPEG_QUALITY};
pub use format::{OutputFormat, UnknownFormatError};
