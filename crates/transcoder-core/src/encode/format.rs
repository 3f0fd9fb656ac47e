//! Output formats the transcoder can produce.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A format name that is not one of the supported output formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown output format: {0:?} (expected jpeg, png or webp)")]
pub struct UnknownFormatError(pub String);

/// Target encoding, chosen once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Every supported output format.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP];

    /// MIME type written alongside the encoded bytes.
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Lowercase format name, also used as the output file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WEBP",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormatError;

    /// Case-insensitive; `jpg` is accepted as `jpeg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(UnknownFormatError(s.to_string())),
        }
    }
}
