//! Shared test fixtures: in-memory encoded images.

use std::io::Cursor;

use image::{DynamicImage, ImageEncoder, ImageFormat, Rgb, RgbImage};

pub(crate) fn encode_as(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// A small gradient JPEG.
pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 40 % 256) as u8, (y * 40 % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Splice an APP1 Exif segment carrying only an orientation tag after SOI.
pub(crate) fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    let mut tiff = vec![
        0x49, 0x49, 0x2A, 0x00, // little-endian TIFF header
        0x08, 0x00, 0x00, 0x00, // IFD0 offset
        0x01, 0x00, // one entry
        0x12, 0x01, // tag 0x0112 Orientation
        0x03, 0x00, // SHORT
        0x01, 0x00, 0x00, 0x00, // count
    ];
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0x00, 0x00]); // value padding
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // no next IFD

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend(tiff);

    let len = (payload.len() + 2) as u16;
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}
