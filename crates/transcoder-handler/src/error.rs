use std::fmt;

use thiserror::Error;
use transcoder_core::{DecodeError, EncodeError, PipelineError, ResizeError, TooLargeError};

use crate::event::MalformedEventError;
use crate::store::StoreError;

/// Where in the request a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Locate,
    Fetch,
    Validate,
    Decode,
    Resize,
    Encode,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Locate => "locate",
            Stage::Fetch => "fetch",
            Stage::Validate => "validate",
            Stage::Decode => "decode",
            Stage::Resize => "resize",
            Stage::Encode => "encode",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Every way a request can fail. Each variant maps to exactly one status.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Malformed event: {0}")]
    MalformedEvent(#[from] MalformedEventError),

    #[error("Failed to fetch object: {0}")]
    Fetch(#[source] StoreError),

    #[error("Object too large: {0}")]
    TooLarge(#[from] TooLargeError),

    #[error("Unsupported or corrupt image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Resize failed: {0}")]
    Resize(#[from] ResizeError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to write output: {0}")]
    Write(#[source] StoreError),
}

impl From<PipelineError> for HandlerError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Resize(e) => HandlerError::Resize(e),
            PipelineError::Encode(e) => HandlerError::Encode(e),
        }
    }
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::MalformedEvent(_) => 400,
            HandlerError::TooLarge(_) => 413,
            HandlerError::Decode(_) => 415,
            HandlerError::Fetch(_)
            | HandlerError::Resize(_)
            | HandlerError::Encode(_)
            | HandlerError::Write(_) => 500,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            HandlerError::MalformedEvent(_) => Stage::Locate,
            HandlerError::Fetch(_) => Stage::Fetch,
            HandlerError::TooLarge(_) => Stage::Validate,
            HandlerError::Decode(_) => Stage::Decode,
            HandlerError::Resize(_) => Stage::Resize,
            HandlerError::Encode(_) => Stage::Encode,
            HandlerError::Write(_) => Stage::Write,
        }
    }

    /// Client-side problems (bad event, oversized or undecodable input)
    /// rather than faults in the service.
    pub fn is_expected(&self) -> bool {
        self.status_code() < 500
    }
}
