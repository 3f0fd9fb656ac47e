//! Alpha compositing onto an opaque background.

use image::{Rgb, RgbImage, RgbaImage};

/// Background used when flattening for formats without alpha.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Blend every pixel over `background` and drop the alpha channel.
///
/// Per channel: `out = src * a + bg * (1 - a)` with `a = alpha / 255`,
/// rounded to nearest.
pub fn flatten(image: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |src: u8, bg: u8| -> u8 {
            // Integer form of src*a + bg*(255-a), divided by 255 with rounding
            ((u32::from(src) * alpha + u32::from(bg) * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(r, background.0[0]),
            blend(g, background.0[1]),
            blend(b, background.0[2]),
        ])
    })
}
