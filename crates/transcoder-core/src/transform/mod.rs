//! Pixel transforms applied between decode and encode.
//!
//! # Transform Order
//!
//! The pipeline applies these in a fixed order:
//! 1. Orientation (bake EXIF orientation into the pixels)
//! 2. Color mode (collapse to 8-bit RGB or RGBA)
//! 3. Resize (exact target size, Lanczos3)

mod color;
mod orientation;
mod resize;

pub use color::{canonical_mode, normalize_color_mode};
pub use orientation::{apply_orientation, normalize_orientation};
pub use resize::{resize_exact, FilterType, ResizeError};
