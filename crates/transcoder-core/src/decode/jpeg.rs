//! JPEG stream completeness check.
//!
//! The JPEG decoder fills missing scan data with gray instead of failing, so
//! a cut-off upload would otherwise decode and be written out as a damaged
//! thumbnail. A complete stream ends with the EOI marker.

const JPEG_END: [u8; 2] = [0xFF, 0xD9];

/// Whether the stream ends with an end-of-image marker.
///
/// Zero padding after the marker is tolerated.
pub(super) fn has_end_marker(bytes: &[u8]) -> bool {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0x00)
        .map_or(0, |i| i + 1);
    bytes[..end].ends_with(&JPEG_END)
}
