//! Per-browser draft storage
//!
//! A string key/value backend (browser local storage in spirit) plus the key
//! layout used by the demos: `{prefix}:{demo_id}:{kind}:v{schema_version}`.
//! Reads never fail from the caller's point of view: backend errors and
//! unparsable values are logged and treated as absent.

pub mod draft;
pub mod file;
pub mod scheduler;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::constants::storage::{PREFIX, SCHEMA_VERSION};

pub use draft::{DraftOptions, DraftStore};
pub use file::FileStore;
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle, TokioScheduler};

/// String key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self.keys()?.into_iter().filter(|k| k.starts_with(prefix)).collect())
    }
}

/// In-memory backend; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Draft,
    Saved,
    Meta,
}

impl StorageKind {
    pub const ALL: [StorageKind; 3] = [StorageKind::Draft, StorageKind::Saved, StorageKind::Meta];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Draft => "draft",
            StorageKind::Saved => "saved",
            StorageKind::Meta => "meta",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata stored next to each draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMeta {
    pub schema_version: u32,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<i64>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<i64>,
}

impl DraftMeta {
    pub fn new(schema_version: u32) -> Self {
        Self {
            schema_version,
            last_saved_at: None,
            last_edited_at: None,
        }
    }
}

/// Namespaced, typed view over a [`KeyValueStore`]
#[derive(Clone)]
pub struct DemoStorage {
    backend: Rc<dyn KeyValueStore>,
    prefix: String,
    schema_version: u32,
}

impl fmt::Debug for DemoStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoStorage")
            .field("prefix", &self.prefix)
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl DemoStorage {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            prefix: PREFIX.to_string(),
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn with_schema_version(mut self, schema_version: u32) -> Self {
        self.schema_version = schema_version;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn key(&self, demo_id: &str, kind: StorageKind) -> String {
        format!("{}:{}:{}:v{}", self.prefix, demo_id, kind, self.schema_version)
    }

    /// Read and parse a value; any failure reads as `None`
    pub fn read<T: DeserializeOwned>(&self, demo_id: &str, kind: StorageKind) -> Option<T> {
        let key = self.key(demo_id, kind);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Storage read failed, treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored value did not parse, treating as absent");
                None
            }
        }
    }

    /// Serialize and store a value (best effort)
    pub fn write<T: Serialize>(&self, demo_id: &str, kind: StorageKind, value: &T) {
        let key = self.key(demo_id, kind);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize value for storage");
                return;
            }
        };
        match self.backend.set(&key, &raw) {
            Ok(()) => debug!(key = %key, bytes = raw.len(), "Wrote storage entry"),
            Err(e) => warn!(key = %key, error = %e, "Storage write failed"),
        }
    }

    pub fn remove(&self, demo_id: &str, kind: StorageKind) {
        self.remove_key(&self.key(demo_id, kind));
    }

    /// Remove the draft, saved and meta entries of the running schema version
    pub fn remove_demo(&self, demo_id: &str) {
        for kind in StorageKind::ALL {
            self.remove(demo_id, kind);
        }
    }

    /// Remove every entry of `demo_id`, whatever schema version wrote it
    pub fn purge_demo(&self, demo_id: &str) {
        self.remove_matching(&format!("{}:{}:", self.prefix, demo_id));
    }

    /// Remove every entry under the prefix
    pub fn clear_all(&self) {
        self.remove_matching(&format!("{}:", self.prefix));
    }

    fn remove_matching(&self, prefix: &str) {
        match self.backend.keys_with_prefix(prefix) {
            Ok(keys) => {
                for key in keys {
                    self.remove_key(&key);
                }
            }
            Err(e) => warn!(prefix = %prefix, error = %e, "Failed to list storage keys"),
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            warn!(key = %key, error = %e, "Storage remove failed");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use anyhow::anyhow;

    /// Backend wrapper that records every `set`
    #[derive(Default)]
    pub struct RecordingStore {
        pub inner: MemoryStore,
        pub writes: RefCell<Vec<(String, String)>>,
    }

    impl RecordingStore {
        pub fn writes_to(&self, key: &str) -> Vec<String> {
            self.writes
                .borrow()
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .collect()
        }
    }

    impl KeyValueStore for RecordingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.writes.borrow_mut().push((key.to_string(), value.to_string()));
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>> {
            self.inner.keys()
        }
    }

    /// Backend whose every operation fails
    pub struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("storage unavailable"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("storage unavailable"))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow!("storage unavailable"))
        }

        fn keys(&self) -> Result<Vec<String>> {
            Err(anyhow!("storage unavailable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::BrokenStore;
    use super::*;

    fn storage() -> (MemoryStore, DemoStorage) {
        let mem = MemoryStore::new();
        let storage = DemoStorage::new(Rc::new(mem.clone()));
        (mem, storage)
    }

    #[test]
    fn test_key_layout() {
        let (_, storage) = storage();
        assert_eq!(storage.key("edit-mode", StorageKind::Draft), "demo-effects:edit-mode:draft:v1");
        let v7 = storage.with_schema_version(7).with_prefix("x");
        assert_eq!(v7.key("funnel-lab", StorageKind::Meta), "x:funnel-lab:meta:v7");
    }

    #[test]
    fn test_write_then_read() {
        let (_, storage) = storage();
        storage.write("funnel-lab", StorageKind::Draft, &vec![1, 2, 3]);
        let back: Option<Vec<i32>> = storage.read("funnel-lab", StorageKind::Draft);
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_unparsable_value_reads_as_absent() {
        let (mem, storage) = storage();
        mem.set(&storage.key("funnel-lab", StorageKind::Draft), "{not json").unwrap();
        let back: Option<Vec<i32>> = storage.read("funnel-lab", StorageKind::Draft);
        assert_eq!(back, None);
    }

    #[test]
    fn test_backend_errors_are_swallowed() {
        let storage = DemoStorage::new(Rc::new(BrokenStore));
        let back: Option<u32> = storage.read("edit-mode", StorageKind::Meta);
        assert_eq!(back, None);
        storage.write("edit-mode", StorageKind::Draft, &1);
        storage.remove_demo("edit-mode");
        storage.clear_all();
    }

    #[test]
    fn test_purge_demo_removes_every_version() {
        let mem = MemoryStore::new();
        let v1 = DemoStorage::new(Rc::new(mem.clone())).with_schema_version(1);
        let v2 = v1.clone().with_schema_version(2);
        v1.write("edit-mode", StorageKind::Saved, &1);
        v2.write("edit-mode", StorageKind::Draft, &2);
        v2.write("funnel-lab", StorageKind::Draft, &3);

        v2.remove_demo("edit-mode");
        assert_eq!(mem.len(), 2);

        v2.purge_demo("edit-mode");
        assert_eq!(mem.keys().unwrap(), vec!["demo-effects:funnel-lab:draft:v2".to_string()]);
    }

    #[test]
    fn test_clear_all_only_touches_prefix() {
        let (mem, storage) = storage();
        mem.set("unrelated", "keep").unwrap();
        storage.write("edit-mode", StorageKind::Draft, &1);
        storage.write("background-lab", StorageKind::Meta, &DraftMeta::new(1));

        storage.clear_all();
        assert_eq!(mem.keys().unwrap(), vec!["unrelated".to_string()]);
    }

    #[test]
    fn test_meta_json_shape() {
        let meta = DraftMeta {
            schema_version: 1,
            last_saved_at: None,
            last_edited_at: Some(42),
        };
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            serde_json::json!({ "schemaVersion": 1, "lastEditedAt": 42 })
        );
    }
}
