//! Device-local key-value cache
//!
//! Mirrors each snapshot field under `{username}_budget_{slot}`. Older
//! versions wrote unnamespaced `budget_{slot}` keys; reads fall back to those
//! once when the namespaced key is missing, and `migrate_legacy` copies them
//! forward.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetLimit, Snapshot, SnapshotField};

use super::file_io::{read_json, write_json_atomic};

/// String-to-string storage with `localStorage` semantics
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> BudgetResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> BudgetResult<()>;
    fn remove(&self, key: &str) -> BudgetResult<()>;
}

/// Key-value store persisted as one JSON object file
///
/// The whole map is rewritten atomically on every change.
pub struct FileKeyValueStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> BudgetResult<Self> {
        let path = path.into();
        let data: BTreeMap<String, String> = read_json(&path)?;
        debug!(path = %path.display(), keys = data.len(), "opened local cache");
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> BudgetResult<Option<String>> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BudgetResult<()> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.insert(key.to_string(), value.to_string());
        write_json_atomic(&self.path, &*data)
    }

    fn remove(&self, key: &str) -> BudgetResult<()> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        if data.remove(key).is_some() {
            write_json_atomic(&self.path, &*data)?;
        }
        Ok(())
    }
}

/// In-memory key-value store
#[derive(Default)]
pub struct MemoryKeyValueStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> BudgetResult<Option<String>> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BudgetResult<()> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> BudgetResult<()> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.remove(key);
        Ok(())
    }
}

/// Per-user view over a key-value store
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
    username: String,
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>, username: impl Into<String>) -> Self {
        Self {
            store,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `{username}_budget_{slot}`
    pub fn namespaced_key(&self, field: SnapshotField) -> String {
        format!("{}_budget_{}", self.username, field.slot())
    }

    /// `budget_{slot}`, written by versions without per-user namespacing
    pub fn legacy_key(field: SnapshotField) -> String {
        format!("budget_{}", field.slot())
    }

    /// Read a field, namespaced key first, then the legacy key
    ///
    /// Returns `None` when neither key holds a usable value.
    pub fn load_field(&self, field: SnapshotField) -> BudgetResult<Option<Value>> {
        let namespaced = self.namespaced_key(field);
        if let Some(value) = self.read_key(field, &namespaced)? {
            return Ok(Some(value));
        }

        let legacy = Self::legacy_key(field);
        let value = self.read_key(field, &legacy)?;
        if value.is_some() {
            debug!(field = %field, key = %legacy, "using legacy cache key");
        }
        Ok(value)
    }

    /// Raw value of `key`; blank values count as absent
    fn get_present(&self, key: &str) -> BudgetResult<Option<String>> {
        Ok(self.store.get(key)?.filter(|raw| !raw.trim().is_empty()))
    }

    fn read_key(&self, field: SnapshotField, key: &str) -> BudgetResult<Option<Value>> {
        let Some(raw) = self.get_present(key)? else {
            return Ok(None);
        };

        if field == SnapshotField::BudgetLimit {
            let limit = BudgetLimit::parse(&raw);
            if limit.is_unset() {
                warn!(key, "ignoring non-numeric budget limit in local cache");
                return Ok(None);
            }
            return Ok(Some(serde_json::to_value(limit)?));
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable value in local cache");
                Ok(None)
            }
        }
    }

    /// Write a field under the namespaced key
    pub fn store_field(&self, snapshot: &Snapshot, field: SnapshotField) -> BudgetResult<()> {
        let text = match field {
            SnapshotField::BudgetLimit => snapshot.budget_limit.to_text(),
            _ => serde_json::to_string(&snapshot.field_value(field)?)?,
        };
        self.store.set(&self.namespaced_key(field), &text)
    }

    /// Build a snapshot from the cache, filling gaps with defaults
    pub fn load_snapshot(&self) -> BudgetResult<Snapshot> {
        let mut snapshot = Snapshot::fresh();
        for field in SnapshotField::ALL {
            if let Some(value) = self.load_field(field)? {
                if let Err(e) = snapshot.set_field(field, value) {
                    warn!(field = %field, error = %e, "cached value has the wrong shape");
                }
            }
        }
        if snapshot.categories.is_none() {
            snapshot.categories = Some(snapshot.categories_or_default());
        }
        Ok(snapshot)
    }

    /// Copy legacy values that have no namespaced counterpart
    ///
    /// Legacy keys are left in place. Returns the fields that were copied.
    pub fn migrate_legacy(&self) -> BudgetResult<Vec<SnapshotField>> {
        let mut migrated = Vec::new();
        for field in SnapshotField::ALL {
            let namespaced = self.namespaced_key(field);
            if self.get_present(&namespaced)?.is_some() {
                continue;
            }
            if let Some(raw) = self.get_present(&Self::legacy_key(field))? {
                self.store.set(&namespaced, &raw)?;
                migrated.push(field);
            }
        }
        Ok(migrated)
    }
}
