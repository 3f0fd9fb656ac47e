//! Trigger event parsing.
//!
//! Only `Records[0].s3.bucket.name` and `Records[0].s3.object.key` are read;
//! every other field is ignored.

use percent_encoding::percent_decode_str;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MalformedEventError {
    #[error("event is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("event has no Records")]
    NoRecords,

    #[error("event record is missing bucket name or object key: {0}")]
    InvalidRecord(#[source] serde_json::Error),
}

/// Where the uploaded object lives. The key is already URL-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct TriggerEvent {
    #[serde(rename = "Records")]
    records: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Record {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEntity {
    key: String,
}

/// Extract the bucket and decoded key from a trigger event.
pub fn locate(event: &Value) -> Result<ObjectLocation, MalformedEventError> {
    let event = TriggerEvent::deserialize(event).map_err(MalformedEventError::InvalidRecord)?;
    let first = event.records.first().ok_or(MalformedEventError::NoRecords)?;
    let record = Record::deserialize(first).map_err(MalformedEventError::InvalidRecord)?;

    Ok(ObjectLocation {
        bucket: record.s3.bucket.name,
        key: decode_key(&record.s3.object.key),
    })
}

/// Parse raw JSON text and locate the object.
pub fn locate_str(raw: &str) -> Result<ObjectLocation, MalformedEventError> {
    let value: Value = serde_json::from_str(raw).map_err(MalformedEventError::InvalidJson)?;
    locate(&value)
}

/// Undo the form encoding keys arrive in: `+` is a space, then `%XX`
/// escapes. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
