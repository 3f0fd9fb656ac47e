//! Output format selection.
//!
//! Rules, first match wins:
//! 1. the source format hint names a supported output format;
//! 2. the image carries alpha, so PNG keeps it;
//! 3. the configured default.

use crate::decode::{DecodedImage, SourceFormat};
use crate::encode::OutputFormat;

/// What the decoder said about the source format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatHint {
    /// The source is itself a supported output format.
    Recognized(OutputFormat),
    /// The decoder named a format we cannot write.
    Unrecognized(String),
    /// The decoder gave no format.
    Absent,
}

impl FormatHint {
    pub fn from_source(source: Option<&SourceFormat>) -> Self {
        match source {
            None => FormatHint::Absent,
            Some(SourceFormat::Jpeg) => FormatHint::Recognized(OutputFormat::Jpeg),
            Some(SourceFormat::Png) => FormatHint::Recognized(OutputFormat::Png),
            Some(SourceFormat::WebP) => FormatHint::Recognized(OutputFormat::WebP),
            Some(SourceFormat::Other(name)) => match name.parse() {
                Ok(format) => FormatHint::Recognized(format),
                Err(_) => FormatHint::Unrecognized(name.clone()),
            },
        }
    }
}

/// Which selection rule produced the output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    SourceHint,
    AlphaPromotion,
    Default,
}

/// Pick the output format and report the rule that fired.
pub fn decide_output_format(
    hint: &FormatHint,
    image: &DecodedImage,
    default: OutputFormat,
) -> (OutputFormat, SelectionRule) {
    if let FormatHint::Recognized(format) = hint {
        return (*format, SelectionRule::SourceHint);
    }
    if image.color_mode.has_alpha() {
        return (OutputFormat::Png, SelectionRule::AlphaPromotion);
    }
    (default, SelectionRule::Default)
}

/// Pick the output format for `image`.
pub fn select_output_format(hint: &FormatHint, image: &DecodedImage, default: OutputFormat) -> OutputFormat {
    let (format, rule) = decide_output_format(hint, image, default);
    log::debug!("Selected {format} output via {rule:?} (hint: {hint:?}, mode: {:?})", image.color_mode);
    format
}
