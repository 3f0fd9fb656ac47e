//! Orientation normalization.
//!
//! Bakes the EXIF orientation into the pixel buffer and clears the stored
//! tag, so viewers no longer need to honor it.

use image::DynamicImage;

use crate::decode::{DecodedImage, Orientation};

/// Apply the image's pending orientation and reset it to `Normal`.
///
/// Running this on an already-normalized image is a no-op.
pub fn normalize_orientation(image: DecodedImage) -> DecodedImage {
    let DecodedImage {
        pixels,
        color_mode,
        source_format,
        orientation,
    } = image;

    DecodedImage {
        pixels: apply_orientation(pixels, orientation),
        color_mode,
        source_format,
        orientation: Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
pub fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
