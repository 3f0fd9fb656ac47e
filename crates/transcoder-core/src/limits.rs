//! Input size ceiling.

use thiserror::Error;

/// The object is larger than the configured ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Input is {size} bytes, over the {ceiling} byte limit")]
pub struct TooLargeError {
    pub size: u64,
    pub ceiling: u64,
}

/// Reject objects whose reported length exceeds `ceiling_bytes`.
///
/// An object of exactly `ceiling_bytes` passes. An unknown length also
/// passes: the check relies on the store's reported size, not on the bytes.
pub fn validate_size(content_length: Option<u64>, ceiling_bytes: u64) -> Result<(), TooLargeError> {
    match content_length {
        Some(size) if size > ceiling_bytes => Err(TooLargeError {
            size,
            ceiling: ceiling_bytes,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_INPUT_SIZE_BYTES;

    #[test]
    fn test_over_ceiling_rejected() {
        let ceiling = DEFAULT_MAX_INPUT_SIZE_BYTES;
        assert_eq!(
            validate_size(Some(ceiling + 1), ceiling),
            Err(TooLargeError {
                size: ceiling + 1,
                ceiling
            })
        );
    }

    #[test]
    fn test_at_ceiling_accepted() {
        assert_eq!(validate_size(Some(100), 100), Ok(()));
        assert_eq!(validate_size(Some(0), 100), Ok(()));
    }

    #[test]
    fn test_unknown_length_bypasses_check() {
        // Known gap: without a reported length nothing is enforced
        assert_eq!(validate_size(None, 0), Ok(()));
    }

    #[test]
    fn test_error_message() {
        let err = validate_size(Some(11), 10).unwrap_err();
        assert_eq!(err.to_string(), "Input is 11 bytes, over the 10 byte limit");
    }
}
