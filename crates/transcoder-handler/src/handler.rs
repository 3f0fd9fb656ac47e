//! Request orchestration: event in, response out.
//!
//! One call to [`Orchestrator::handle`] processes one uploaded object:
//! locate it, skip it if it is already an output, fetch it, check its size,
//! decode, transcode, and write the result next to the other outputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use transcoder_core::{decode_image, is_already_processed, map_key, validate_size, TranscodePipeline};

use crate::config::HandlerConfig;
use crate::error::HandlerError;
use crate::event::{locate, locate_str, MalformedEventError, ObjectLocation};
use crate::store::{ObjectStore, PutObject};

/// Log target used when none is given.
pub const DEFAULT_LOG_TARGET: &str = "transcoder_handler";

/// What the invocation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Runs one request at a time against an object store.
///
/// Holds no state between requests beyond what it was built with.
pub struct Orchestrator<S> {
    store: S,
    config: HandlerConfig,
    pipeline: TranscodePipeline,
    log_target: String,
}

impl<S: ObjectStore> Orchestrator<S> {
    pub fn new(store: S, config: HandlerConfig) -> Self {
        let pipeline = TranscodePipeline::new(config.pipeline_config());
        Self {
            store,
            config,
            pipeline,
            log_target: DEFAULT_LOG_TARGET.to_string(),
        }
    }

    /// Send this orchestrator's log records to `target`.
    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }

    /// Handle a parsed trigger event.
    pub fn handle(&self, event: &Value) -> Response {
        self.respond(locate(event))
    }

    /// Handle a trigger event given as JSON text.
    pub fn handle_str(&self, raw: &str) -> Response {
        self.respond(locate_str(raw))
    }

    fn respond(&self, location: Result<ObjectLocation, MalformedEventError>) -> Response {
        let location = match location {
            Ok(location) => location,
            Err(e) => return self.fail(None, e.into()),
        };

        match self.process(&location) {
            Ok(message) => Response::new(200, message),
            Err(e) => self.fail(Some(&location), e),
        }
    }

    fn process(&self, location: &ObjectLocation) -> Result<String, HandlerError> {
        let ObjectLocation { bucket, key } = location;
        let target = self.log_target.as_str();

        if is_already_processed(key, &self.config.processed_prefix) {
            log::info!(target: target, "bucket={bucket} key={key}: already processed, skipping");
            return Ok(format!("Skipped {key}: already under {}", self.config.processed_prefix));
        }

        let object = self.store.get(bucket, key).map_err(HandlerError::Fetch)?;
        validate_size(object.content_length, self.config.max_input_size_bytes)?;

        let decoded = decode_image(&object.bytes)?;
        log::debug!(
            target: target,
            "bucket={bucket} key={key}: decoded {}x{} {:?}",
            decoded.width(),
            decoded.height(),
            decoded.color_mode
        );

        let encoded = self.pipeline.run(decoded)?;
        let output_key = map_key(key, &self.config.processed_prefix, encoded.format);

        let output = PutObject {
            bytes: encoded.bytes,
            content_type: encoded.content_type.to_string(),
            metadata: object.metadata,
        };
        self.store
            .put(bucket, &output_key, output)
            .map_err(HandlerError::Write)?;

        log::info!(
            target: target,
            "bucket={bucket} key={key}: wrote {output_key} as {}",
            encoded.format
        );
        Ok(format!("Processed {key} and saved to {output_key}"))
    }

    fn fail(&self, location: Option<&ObjectLocation>, err: HandlerError) -> Response {
        let target = self.log_target.as_str();
        let (bucket, key) = location
            .map(|l| (l.bucket.as_str(), l.key.as_str()))
            .unwrap_or(("-", "-"));
        let stage = err.stage();
        let status = err.status_code();

        if err.is_expected() {
            log::warn!(target: target, "bucket={bucket} key={key} stage={stage} status={status}: {err}");
        } else {
            log::error!(target: target, "bucket={bucket} key={key} stage={stage} status={status}: {err}");
        }

        Response::new(status, err.to_string())
    }
}
