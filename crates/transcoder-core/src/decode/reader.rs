//! Content-sniffed image decoding with EXIF orientation and color mode detection.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::{jpeg, png, ColorMode, DecodeError, DecodedImage, Orientation, SourceFormat};

/// Decode an image from bytes.
///
/// The container format is guessed from the content, never from a file name.
/// Pixel data is fully materialized; orientation is *not* applied here but
/// recorded on the returned image for the pipeline to normalize.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for an empty buffer,
/// `DecodeError::InvalidFormat` if no enabled decoder recognizes the bytes, and
/// `DecodeError::CorruptedFile` if the data is malformed or truncated.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;
    if format == ImageFormat::Jpeg && !jpeg::has_end_marker(bytes) {
        return Err(DecodeError::CorruptedFile(
            "JPEG stream ends before the end-of-image marker".to_string(),
        ));
    }

    let pixels = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;

    let color_mode = detect_color_mode(bytes, format, &pixels);
    let orientation = extract_orientation(bytes);

    log::debug!(
        "decoded {:?} {}x{} mode={:?} orientation={:?}",
        format,
        pixels.width(),
        pixels.height(),
        color_mode,
        orientation
    );

    Ok(DecodedImage {
        pixels,
        color_mode,
        source_format: Some(SourceFormat::from_image_format(format)),
        orientation,
    })
}

/// Work out the color mode the source file was stored in.
///
/// Palette formats are expanded by the decoder, so they are recovered from
/// the container: PNG from its header chunks, GIF from whether any pixel
/// came out transparent.
fn detect_color_mode(bytes: &[u8], format: ImageFormat, pixels: &DynamicImage) -> ColorMode {
    match format {
        ImageFormat::Png => png::palette_mode(bytes)
            .unwrap_or_else(|| ColorMode::from_color_type(pixels.color())),
        ImageFormat::Gif => {
            if is_fully_opaque(pixels) {
                ColorMode::Palette
            } else {
                ColorMode::PaletteWithTransparency
            }
        }
        _ => ColorMode::from_color_type(pixels.color()),
    }
}

fn is_fully_opaque(pixels: &DynamicImage) -> bool {
    match pixels.as_rgba8() {
        Some(buf) => buf.pixels().all(|p| p.0[3] == u8::MAX),
        None => !pixels.color().has_alpha(),
    }
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}
