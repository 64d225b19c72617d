use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use thiserror::Error;

use crate::keys::PushKeyGenerator;

/// Records of one resource, keyed by store-assigned key. Values never carry
/// their own key.
pub type Collection = BTreeMap<String, Value>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is not a keyed document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("document lock poisoned")]
    Poisoned,
}

struct Inner {
    collections: BTreeMap<String, Collection>,
    keys: PushKeyGenerator,
    data_path: Option<PathBuf>,
}

/// Cloneable handle to the keyed JSON document. Every clone shares the same
/// state; mutations are flushed to the snapshot file when one is configured.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<Mutex<Inner>>,
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self::from_collections(BTreeMap::new(), None)
    }

    /// Opens a store backed by `data_path`, loading the snapshot if the file
    /// already exists.
    pub fn open(data_path: Option<&Path>) -> Result<Self, DocumentError> {
        let Some(path) = data_path else {
            return Ok(Self::in_memory());
        };
        let collections = if path.exists() {
            let raw = fs::read(path).map_err(|source| DocumentError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            if raw.iter().all(u8::is_ascii_whitespace) {
                BTreeMap::new()
            } else {
                serde_json::from_slice::<Option<BTreeMap<String, Collection>>>(&raw)
                    .map_err(|source| DocumentError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?
                    .unwrap_or_default()
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(
            path = %path.display(),
            resources = collections.len(),
            "document snapshot loaded"
        );
        Ok(Self::from_collections(collections, Some(path.to_path_buf())))
    }

    fn from_collections(
        collections: BTreeMap<String, Collection>,
        data_path: Option<PathBuf>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                collections,
                keys: PushKeyGenerator::new(),
                data_path,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DocumentError> {
        self.inner.lock().map_err(|_| DocumentError::Poisoned)
    }

    /// The whole collection, or `None` when it holds no records.
    pub fn list(&self, resource: &str) -> Result<Option<Collection>, DocumentError> {
        let inner = self.lock()?;
        Ok(inner
            .collections
            .get(resource)
            .filter(|collection| !collection.is_empty())
            .cloned())
    }

    pub fn get(&self, resource: &str, key: &str) -> Result<Option<Value>, DocumentError> {
        let inner = self.lock()?;
        Ok(inner
            .collections
            .get(resource)
            .and_then(|collection| collection.get(key))
            .cloned())
    }

    /// Stores `value` under a freshly minted key and returns the key.
    pub fn push(&self, resource: &str, value: Value) -> Result<String, DocumentError> {
        let mut inner = self.lock()?;
        let key = inner.keys.next_key();
        if !value.is_null() {
            inner.commit(|collections| {
                collections
                    .entry(resource.to_string())
                    .or_default()
                    .insert(key.clone(), value);
            })?;
        }
        Ok(key)
    }

    /// Replaces the record at `key` wholesale. Writing `null` removes it.
    pub fn put(&self, resource: &str, key: &str, value: Value) -> Result<Value, DocumentError> {
        let mut inner = self.lock()?;
        inner.commit(|collections| {
            if value.is_null() {
                remove_record(collections, resource, key);
            } else {
                collections
                    .entry(resource.to_string())
                    .or_default()
                    .insert(key.to_string(), value.clone());
            }
        })?;
        Ok(value)
    }

    /// Removes the record at `key`; returns whether anything was there.
    pub fn delete(&self, resource: &str, key: &str) -> Result<bool, DocumentError> {
        let mut inner = self.lock()?;
        let present = inner
            .collections
            .get(resource)
            .is_some_and(|collection| collection.contains_key(key));
        if present {
            inner.commit(|collections| remove_record(collections, resource, key))?;
        }
        Ok(present)
    }

    pub fn count(&self, resource: &str) -> Result<usize, DocumentError> {
        let inner = self.lock()?;
        Ok(inner.collections.get(resource).map_or(0, BTreeMap::len))
    }
}

impl Inner {
    /// Applies `change` and persists the result. With a snapshot file the
    /// change is made on a copy that only replaces the live collections once
    /// the file is written, so a failed write leaves the store untouched.
    fn commit<R>(
        &mut self,
        change: impl FnOnce(&mut BTreeMap<String, Collection>) -> R,
    ) -> Result<R, DocumentError> {
        let Some(path) = &self.data_path else {
            return Ok(change(&mut self.collections));
        };
        let mut staged = self.collections.clone();
        let outcome = change(&mut staged);
        write_snapshot(path, &staged)?;
        self.collections = staged;
        Ok(outcome)
    }
}

/// Drops a record, and its collection once that is empty.
fn remove_record(collections: &mut BTreeMap<String, Collection>, resource: &str, key: &str) {
    let Some(collection) = collections.get_mut(resource) else {
        return;
    };
    collection.remove(key);
    if collection.is_empty() {
        collections.remove(resource);
    }
}

fn write_snapshot(
    path: &Path,
    collections: &BTreeMap<String, Collection>,
) -> Result<(), DocumentError> {
    let encoded = serde_json::to_vec_pretty(collections).map_err(DocumentError::Encode)?;
    fs::write(path, encoded).map_err(|source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    })
}
