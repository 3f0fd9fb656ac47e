//! Object storage.
//!
//! The [`ObjectStore`] trait covers the two calls the handler makes: fetch
//! the uploaded object and write the transcoded one. [`InMemoryStore`] backs
//! tests and embedding; [`FsObjectStore`] maps buckets onto directories.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

/// User metadata attached to an object.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("invalid object key: {0:?}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("store rejected request: {0}")]
    Rejected(String),
}

/// An object as returned by [`ObjectStore::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// Size as reported by the store, which may differ from `bytes.len()`
    /// or be unknown.
    pub content_length: Option<u64>,
    pub metadata: Metadata,
}

impl StoredObject {
    /// An object whose reported length matches its bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        let content_length = Some(bytes.len() as u64);
        Self {
            bytes,
            content_length,
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// An object to write with [`ObjectStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub metadata: Metadata,
}

pub trait ObjectStore {
    /// Fetch an object with its content type, reported length and metadata.
    fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError>;

    /// Write an object, replacing any existing one at the same key.
    fn put(&self, bucket: &str, key: &str, object: PutObject) -> Result<(), StoreError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        (**self).get(bucket, key)
    }

    fn put(&self, bucket: &str, key: &str, object: PutObject) -> Result<(), StoreError> {
        (**self).put(bucket, key, object)
    }
}

/// A store held entirely in memory.
///
/// Uses `Mutex` so a shared reference can both read and record writes.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object. Not counted as a write.
    pub fn insert(&self, bucket: &str, key: &str, object: StoredObject) {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bucket.to_string(), key.to_string()), object);
    }

    /// Look at an object without going through [`ObjectStore::get`].
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Every `(bucket, key)` passed to `put`, in order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ObjectStore for InMemoryStore {
    fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        self.object(bucket, key).ok_or_else(|| StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    fn put(&self, bucket: &str, key: &str, object: PutObject) -> Result<(), StoreError> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((bucket.to_string(), key.to_string()));

        let stored = StoredObject::new(object.bytes)
            .with_content_type(object.content_type)
            .with_metadata(object.metadata);
        self.insert(bucket, key, stored);
        Ok(())
    }
}

/// Sidecar file holding what a plain file cannot.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Sidecar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default)]
    metadata: Metadata,
}

/// Objects stored as files under `<root>/<bucket>/<key>`.
///
/// Content type and metadata live next to each object in
/// `<key>.meta.json`; objects without a sidecar have neither. Both files are
/// staged in the target directory and renamed into place, sidecar first, so
/// a failed `put` leaves no object behind.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        for part in [bucket, key] {
            let relative = Path::new(part);
            let escapes = relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if part.is_empty() || escapes {
                return Err(StoreError::InvalidKey(part.to_string()));
            }
        }
        Ok(self.root.join(bucket).join(key))
    }

    fn sidecar_path(object_path: &Path) -> PathBuf {
        let mut path = object_path.as_os_str().to_owned();
        path.push(".meta.json");
        PathBuf::from(path)
    }

    /// Write `contents` to a temporary file in `dir`. Dropping the result
    /// before it is persisted removes the file.
    fn stage(dir: &Path, contents: &[u8]) -> io::Result<NamedTempFile> {
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(contents)?;
        staged.as_file().sync_all()?;
        Ok(staged)
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        let path = self.object_path(bucket, key)?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let content_length = fs::metadata(&path)?.len();

        let sidecar = match fs::read_to_string(Self::sidecar_path(&path)) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Sidecar::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(StoredObject {
            bytes,
            content_type: sidecar.content_type,
            content_length: Some(content_length),
            metadata: sidecar.metadata,
        })
    }

    fn put(&self, bucket: &str, key: &str, object: PutObject) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        fs::create_dir_all(dir)?;

        let sidecar = Sidecar {
            content_type: Some(object.content_type),
            metadata: object.metadata,
        };
        let json = serde_json::to_string_pretty(&sidecar)?;

        let staged_object = Self::stage(dir, &object.bytes)?;
        let staged_sidecar = Self::stage(dir, json.as_bytes())?;

        let sidecar_path = Self::sidecar_path(&path);
        staged_sidecar
            .persist(&sidecar_path)
            .map_err(|e| StoreError::Io(e.error))?;

        if let Err(e) = staged_object.persist(&path) {
            // Best effort
            let _ = fs::remove_file(&sidecar_path);
            return Err(StoreError::Io(e.error));
        }
        Ok(())
    }
}
