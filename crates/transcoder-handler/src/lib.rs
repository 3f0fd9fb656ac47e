//! Transcoder Handler - object-store trigger for the image transcoder
//!
//! Turns an upload notification into a fetch, a transcode via
//! `transcoder-core`, and a write of the result under the processed prefix.

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod store;

pub use config::{ConfigError, HandlerConfig};
pub use error::{HandlerError, Stage};
pub use event::{locate, MalformedEventError, ObjectLocation};
pub use handler::{Orchestrator, Response};
pub use store::{FsObjectStore, InMemoryStore, ObjectStore, PutObject, StoreError, StoredObject};
