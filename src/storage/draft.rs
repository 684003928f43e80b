//! Draft / saved persistence for a single demo
//!
//! Each demo keeps a working draft (written with a debounce), an optional
//! saved snapshot and a small meta record. Stored data whose meta carries a
//! different schema version is purged on open.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::scheduler::{Scheduler, TaskHandle};
use super::{DemoStorage, DraftMeta, StorageKind};
use crate::constants::storage::DEFAULT_DEBOUNCE_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftOptions {
    /// Whether `save` is meaningful for this demo
    pub enable_save: bool,
    pub debounce: Duration,
}

impl Default for DraftOptions {
    fn default() -> Self {
        Self {
            enable_save: false,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl DraftOptions {
    pub fn debounce_ms(ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(ms),
            ..Self::default()
        }
    }

    pub fn with_save(mut self) -> Self {
        self.enable_save = true;
        self
    }
}

struct Inner<T> {
    draft: T,
    saved: Option<T>,
    meta: DraftMeta,
    pending: Option<TaskHandle>,
}

/// Structural equality through the JSON representation
///
/// Values that fail to serialize never compare equal.
pub fn deep_equal<T: Serialize>(a: &T, b: &T) -> bool {
    match (serde_json::to_value(a), serde_json::to_value(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub struct DraftStore<T> {
    demo_id: String,
    default: T,
    options: DraftOptions,
    storage: DemoStorage,
    scheduler: Rc<dyn Scheduler>,
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> DraftStore<T>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
{
    /// Hydrate from storage
    ///
    /// With a matching meta record the draft is the stored draft, else the
    /// stored saved value, else `default`. A missing or mismatched meta
    /// record drops whatever is stored for the demo and starts from `default`.
    pub fn open(
        storage: DemoStorage,
        demo_id: impl Into<String>,
        default: T,
        options: DraftOptions,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let demo_id = demo_id.into();
        let schema_version = storage.schema_version();

        let inner = match storage.read::<DraftMeta>(&demo_id, StorageKind::Meta) {
            Some(meta) if meta.schema_version == schema_version => {
                let saved: Option<T> = storage.read(&demo_id, StorageKind::Saved);
                let draft = storage
                    .read::<T>(&demo_id, StorageKind::Draft)
                    .or_else(|| saved.clone())
                    .unwrap_or_else(|| default.clone());
                debug!(demo = %demo_id, has_saved = saved.is_some(), "Hydrated draft from storage");
                Inner {
                    draft,
                    saved,
                    meta,
                    pending: None,
                }
            }
            found => {
                match found {
                    Some(meta) => warn!(
                        demo = %demo_id,
                        stored = meta.schema_version,
                        expected = schema_version,
                        "Schema version mismatch, discarding stored draft"
                    ),
                    None => debug!(demo = %demo_id, "No stored meta, starting from defaults"),
                }
                storage.purge_demo(&demo_id);
                Inner {
                    draft: default.clone(),
                    saved: None,
                    meta: DraftMeta::new(schema_version),
                    pending: None,
                }
            }
        };

        Self {
            demo_id,
            default,
            options,
            storage,
            scheduler,
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn demo_id(&self) -> &str {
        &self.demo_id
    }

    pub fn options(&self) -> DraftOptions {
        self.options
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn draft(&self) -> T {
        self.inner.borrow().draft.clone()
    }

    pub fn with_draft<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().draft)
    }

    pub fn saved(&self) -> Option<T> {
        self.inner.borrow().saved.clone()
    }

    pub fn meta(&self) -> DraftMeta {
        self.inner.borrow().meta.clone()
    }

    /// Replace the draft and schedule a debounced write
    pub fn set_draft(&self, value: T) {
        self.inner.borrow_mut().draft = value;
        self.schedule_write();
    }

    /// Derive the next draft from the current one
    pub fn update_draft(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.inner.borrow().draft);
        self.set_draft(next);
    }

    /// Snapshot the draft as the saved value; no-op unless saving is enabled
    pub fn save(&self) {
        if !self.options.enable_save {
            debug!(demo = %self.demo_id, "Save requested on a demo without saving, ignoring");
            return;
        }
        let mut inner = self.inner.borrow_mut();
        let snapshot = inner.draft.clone();
        self.storage.write(&self.demo_id, StorageKind::Saved, &snapshot);
        inner.saved = Some(snapshot);
        inner.meta.schema_version = self.storage.schema_version();
        inner.meta.last_saved_at = Some(now_ms());
        self.storage.write(&self.demo_id, StorageKind::Meta, &inner.meta);
        info!(demo = %self.demo_id, "Saved draft");
    }

    /// Return the draft to its default, persisting immediately
    pub fn reset(&self, clear_saved: bool) {
        self.cancel_pending();
        let mut inner = self.inner.borrow_mut();
        inner.draft = self.default.clone();
        self.storage.write(&self.demo_id, StorageKind::Draft, &inner.draft);
        if clear_saved {
            inner.saved = None;
            self.storage.remove(&self.demo_id, StorageKind::Saved);
        }
        inner.meta.schema_version = self.storage.schema_version();
        inner.meta.last_edited_at = Some(now_ms());
        self.storage.write(&self.demo_id, StorageKind::Meta, &inner.meta);
        info!(demo = %self.demo_id, clear_saved, "Reset draft");
    }

    /// Remove everything stored for the demo and return to defaults
    pub fn clear(&self) {
        self.cancel_pending();
        self.storage.remove_demo(&self.demo_id);
        let mut inner = self.inner.borrow_mut();
        inner.draft = self.default.clone();
        inner.saved = None;
        inner.meta = DraftMeta::new(self.storage.schema_version());
        info!(demo = %self.demo_id, "Cleared stored draft");
    }

    /// Draft differs from the saved value (or from the default when nothing is saved)
    ///
    /// Always false when saving is disabled.
    pub fn is_dirty(&self) -> bool {
        if !self.options.enable_save {
            return false;
        }
        let inner = self.inner.borrow();
        let baseline = inner.saved.as_ref().unwrap_or(&self.default);
        !deep_equal(&inner.draft, baseline)
    }

    pub fn has_pending_write(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Write a pending debounced draft now
    pub fn flush(&self) {
        let pending = self.inner.borrow_mut().pending.take();
        if let Some(handle) = pending {
            handle.cancel();
            persist_draft(&self.storage, &self.demo_id, &self.inner);
        }
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.inner.borrow_mut().pending.take() {
            handle.cancel();
        }
    }

    fn schedule_write(&self) {
        self.cancel_pending();
        let storage = self.storage.clone();
        let demo_id = self.demo_id.clone();
        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        let handle = self.scheduler.schedule(
            self.options.debounce,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    persist_draft(&storage, &demo_id, &inner);
                }
            }),
        );
        self.inner.borrow_mut().pending = Some(handle);
    }
}

fn persist_draft<T: Serialize>(storage: &DemoStorage, demo_id: &str, inner: &RefCell<Inner<T>>) {
    let mut inner = inner.borrow_mut();
    inner.pending = None;
    storage.write(demo_id, StorageKind::Draft, &inner.draft);
    inner.meta.schema_version = storage.schema_version();
    inner.meta.last_edited_at = Some(now_ms());
    storage.write(demo_id, StorageKind::Meta, &inner.meta);
    debug!(demo = %demo_id, "Persisted draft");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::scheduler::ManualScheduler;
    use crate::storage::testing::{BrokenStore, RecordingStore};
    use crate::storage::KeyValueStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
        label: String,
    }

    impl Default for Counter {
        fn default() -> Self {
            Self {
                value: 0,
                label: "start".to_string(),
            }
        }
    }

    fn counter(value: u32) -> Counter {
        Counter {
            value,
            ..Counter::default()
        }
    }

    struct Harness {
        backend: Rc<RecordingStore>,
        scheduler: ManualScheduler,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                backend: Rc::new(RecordingStore::default()),
                scheduler: ManualScheduler::new(),
            }
        }

        fn storage(&self, version: u32) -> DemoStorage {
            DemoStorage::new(self.backend.clone()).with_schema_version(version)
        }

        fn open(&self, version: u32, options: DraftOptions) -> DraftStore<Counter> {
            DraftStore::open(
                self.storage(version),
                "edit-mode",
                Counter::default(),
                options,
                Rc::new(self.scheduler.clone()),
            )
        }
    }

    #[test]
    fn test_fresh_open_uses_default() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::default());
        assert_eq!(store.draft(), Counter::default());
        assert_eq!(store.saved(), None);
        assert_eq!(store.meta(), DraftMeta::new(1));
        assert!(!store.has_pending_write());
    }

    #[test]
    fn test_debounce_coalesces_writes() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::default());
        let key = h.storage(1).key("edit-mode", StorageKind::Draft);

        store.set_draft(counter(1));
        h.scheduler.advance(Duration::from_millis(100));
        store.set_draft(counter(2));
        h.scheduler.advance(Duration::from_millis(100));
        store.set_draft(counter(3));
        assert!(store.has_pending_write());

        // 299ms after the last write nothing has landed
        h.scheduler.advance(Duration::from_millis(299));
        assert!(h.backend.writes_to(&key).is_empty());

        h.scheduler.advance(Duration::from_millis(1));
        let writes = h.backend.writes_to(&key);
        assert_eq!(writes.len(), 1);
        let written: Counter = serde_json::from_str(&writes[0]).unwrap();
        assert_eq!(written.value, 3);
        assert!(!store.has_pending_write());
        assert!(store.meta().last_edited_at.is_some());
    }

    #[test]
    fn test_custom_debounce() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::debounce_ms(120));
        let key = h.storage(1).key("edit-mode", StorageKind::Draft);

        store.set_draft(counter(9));
        h.scheduler.advance(Duration::from_millis(120));
        assert_eq!(h.backend.writes_to(&key).len(), 1);
    }

    #[test]
    fn test_reopen_hydrates_draft_and_saved() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::default().with_save());
        store.set_draft(counter(5));
        store.save();
        store.set_draft(counter(6));
        h.scheduler.run_pending();

        let reopened = h.open(1, DraftOptions::default().with_save());
        assert_eq!(reopened.draft().value, 6);
        assert_eq!(reopened.saved().map(|s| s.value), Some(5));
        assert!(reopened.meta().last_saved_at.is_some());
    }

    #[test]
    fn test_hydrate_falls_back_to_saved() {
        let h = Harness::new();
        let storage = h.storage(1);
        storage.write("edit-mode", StorageKind::Meta, &DraftMeta::new(1));
        storage.write("edit-mode", StorageKind::Saved, &counter(4));

        let store = h.open(1, DraftOptions::default().with_save());
        assert_eq!(store.draft().value, 4);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_schema_bump_discards_stored_data() {
        let h = Harness::new();
        let v1 = h.open(1, DraftOptions::default().with_save());
        v1.set_draft(counter(7));
        v1.save();
        h.scheduler.run_pending();
        assert!(!h.backend.inner.is_empty());

        let v2 = h.open(2, DraftOptions::default().with_save());
        assert_eq!(v2.draft(), Counter::default());
        assert_eq!(v2.saved(), None);
        assert!(h.backend.inner.is_empty());

        // Opening v1 again finds nothing left to hydrate
        let again = h.open(1, DraftOptions::default());
        assert_eq!(again.draft(), Counter::default());
    }

    #[test]
    fn test_missing_meta_discards_orphans() {
        let h = Harness::new();
        let storage = h.storage(1);
        storage.write("edit-mode", StorageKind::Draft, &counter(3));

        let store = h.open(1, DraftOptions::default());
        assert_eq!(store.draft(), Counter::default());
        assert!(h.backend.inner.is_empty());
    }

    #[test]
    fn test_dirty_tracking() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::default().with_save());
        assert!(!store.is_dirty());

        store.set_draft(counter(1));
        assert!(store.is_dirty());

        store.save();
        assert!(!store.is_dirty());

        store.set_draft(counter(1));
        assert!(!store.is_dirty());

        store.update_draft(|c| Counter {
            label: "changed".to_string(),
            ..c.clone()
        });
        assert!(store.is_dirty());
    }

    #[test]
    fn test_save_disabled_is_noop() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::default());
        store.set_draft(counter(1));
        store.save();

        assert_eq!(store.saved(), None);
        assert!(!store.is_dirty());
        assert!(h.backend.writes_to(&h.storage(1).key("edit-mode", StorageKind::Saved)).is_empty());
    }

    #[test]
    fn test_reset_keeps_or_clears_saved() {
        let h = Harness::new();
        let storage = h.storage(1);
        let saved_key = storage.key("edit-mode", StorageKind::Saved);
        let draft_key = storage.key("edit-mode", StorageKind::Draft);

        let store = h.open(1, DraftOptions::default().with_save());
        store.set_draft(counter(2));
        store.save();
        store.set_draft(counter(3));

        store.reset(false);
        assert_eq!(store.draft(), Counter::default());
        assert_eq!(store.saved().map(|s| s.value), Some(2));
        // Saved stays the baseline
        assert!(store.is_dirty());
        assert!(!store.has_pending_write());
        assert_eq!(h.backend.writes_to(&draft_key).len(), 1);

        // The cancelled debounce never fires
        h.scheduler.run_pending();
        assert_eq!(h.backend.writes_to(&draft_key).len(), 1);

        store.reset(true);
        assert_eq!(store.saved(), None);
        assert_eq!(h.backend.inner.get(&saved_key).unwrap(), None);
        assert!(!store.is_dirty());
        assert!(store.meta().last_edited_at.is_some());
    }

    #[test]
    fn test_clear_removes_everything() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::default().with_save());
        store.set_draft(counter(2));
        store.save();
        h.scheduler.run_pending();

        store.set_draft(counter(8));
        store.clear();
        h.scheduler.run_pending();

        assert!(h.backend.inner.is_empty());
        assert_eq!(store.draft(), Counter::default());
        assert_eq!(store.saved(), None);
        assert_eq!(store.meta(), DraftMeta::new(1));
    }

    #[test]
    fn test_flush_writes_immediately() {
        let h = Harness::new();
        let store = h.open(1, DraftOptions::default());
        let key = h.storage(1).key("edit-mode", StorageKind::Draft);

        store.set_draft(counter(11));
        store.flush();
        assert_eq!(h.backend.writes_to(&key).len(), 1);
        assert!(!store.has_pending_write());

        h.scheduler.run_pending();
        assert_eq!(h.backend.writes_to(&key).len(), 1);
    }

    #[test]
    fn test_dropped_store_does_not_write() {
        let h = Harness::new();
        let key = h.storage(1).key("edit-mode", StorageKind::Draft);
        {
            let store = h.open(1, DraftOptions::default());
            store.set_draft(counter(1));
        }
        h.scheduler.run_pending();
        assert!(h.backend.writes_to(&key).is_empty());
    }

    #[test]
    fn test_broken_backend_keeps_memory_state() {
        let scheduler = ManualScheduler::new();
        let store = DraftStore::open(
            DemoStorage::new(Rc::new(BrokenStore)),
            "funnel-lab",
            Counter::default(),
            DraftOptions::default().with_save(),
            Rc::new(scheduler.clone()),
        );
        store.set_draft(counter(3));
        scheduler.run_pending();
        store.save();

        assert_eq!(store.draft().value, 3);
        assert_eq!(store.saved().map(|s| s.value), Some(3));
    }

    #[test]
    fn test_deep_equal_is_structural() {
        assert!(deep_equal(&counter(1), &counter(1)));
        assert!(!deep_equal(&counter(1), &counter(2)));
    }
}
