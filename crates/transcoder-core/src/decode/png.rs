//! Minimal PNG chunk walker.
//!
//! The `image` crate expands indexed PNGs to RGB/RGBA while decoding, so the
//! original palette layout is recovered from the header chunks instead.

use super::ColorMode;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// IHDR color type for indexed color.
const COLOR_TYPE_INDEXED: u8 = 3;

/// Offset of the color type byte inside the IHDR payload.
const IHDR_COLOR_TYPE_OFFSET: usize = 9;

/// Iterator over `(chunk type, chunk data)` pairs. Stops at the first
/// chunk that runs past the end of the buffer. CRCs are not checked.
struct Chunks<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = ([u8; 4], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.data.get(self.pos..self.pos + 8)?;
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = [header[4], header[5], header[6], header[7]];

        let start = self.pos + 8;
        let body = self.data.get(start..start.checked_add(len)?)?;
        self.pos = start + len + 4;

        Some((kind, body))
    }
}

fn chunks(bytes: &[u8]) -> Option<Chunks<'_>> {
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return None;
    }
    Some(Chunks {
        data: bytes,
        pos: PNG_SIGNATURE.len(),
    })
}

/// Report `Palette` or `PaletteWithTransparency` for indexed PNGs.
///
/// Returns `None` for non-PNG input and for PNGs that are not indexed.
pub(super) fn palette_mode(bytes: &[u8]) -> Option<ColorMode> {
    let mut chunks = chunks(bytes)?;

    let (kind, ihdr) = chunks.next()?;
    if &kind != b"IHDR" || *ihdr.get(IHDR_COLOR_TYPE_OFFSET)? != COLOR_TYPE_INDEXED {
        return None;
    }

    // tRNS must precede the first IDAT
    for (kind, _) in chunks {
        match &kind {
            b"tRNS" => return Some(ColorMode::PaletteWithTransparency),
            b"IDAT" | b"IEND" => break,
            _ => {}
        }
    }

    Some(ColorMode::Palette)
}
