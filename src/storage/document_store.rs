//! Remote per-user document store
//!
//! Each user owns one JSON object whose top-level keys are snapshot fields.
//! Writes merge: every provided field replaces the stored one and all other
//! fields stay as they were (last write wins, per field).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::settings::validate_username;
use crate::error::{BudgetError, BudgetResult};

use super::file_io::{read_json_optional, write_json_atomic};

/// A user's remote document
pub type Document = Map<String, Value>;

/// Remote key-value document collaborator
pub trait DocumentStore: Send + Sync {
    /// Fetch the user's document, if one exists
    fn get(&self, user_key: &str) -> BudgetResult<Option<Document>>;

    /// Merge `fields` into the user's document, creating it if missing
    fn merge_set(&self, user_key: &str, fields: Document) -> BudgetResult<()>;
}

/// Document store keeping one `{user}.json` file per user
pub struct FileDocumentStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, user_key: &str) -> BudgetResult<PathBuf> {
        validate_username(user_key)
            .map_err(|_| BudgetError::Remote(format!("Invalid document key '{}'", user_key)))?;
        Ok(self.dir.join(format!("{}.json", user_key)))
    }

    fn read(&self, path: &Path) -> BudgetResult<Option<Document>> {
        read_json_optional(path).map_err(|e| BudgetError::Remote(e.to_string()))
    }
}

impl DocumentStore for FileDocumentStore {
    fn get(&self, user_key: &str) -> BudgetResult<Option<Document>> {
        let path = self.document_path(user_key)?;
        self.read(&path)
    }

    fn merge_set(&self, user_key: &str, fields: Document) -> BudgetResult<()> {
        let path = self.document_path(user_key)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| BudgetError::Remote(format!("Failed to acquire write lock: {}", e)))?;

        let mut document = self.read(&path)?.unwrap_or_default();
        debug!(user = user_key, fields = fields.len(), "merging remote document");
        document.extend(fields);

        write_json_atomic(&path, &document).map_err(|e| BudgetError::Remote(e.to_string()))
    }
}

/// In-memory document store
///
/// Can be switched offline so every call fails, for exercising the
/// unreachable-remote paths.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
    offline: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> BudgetResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BudgetError::Remote("document store is unreachable".into()));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get(&self, user_key: &str) -> BudgetResult<Option<Document>> {
        self.check_online()?;
        let documents = self.documents.read().map_err(|e| {
            BudgetError::Remote(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(documents.get(user_key).cloned())
    }

    fn merge_set(&self, user_key: &str, fields: Document) -> BudgetResult<()> {
        self.check_online()?;
        let mut documents = self.documents.write().map_err(|e| {
            BudgetError::Remote(format!("Failed to acquire write lock: {}", e))
        })?;
        documents
            .entry(user_key.to_string())
            .or_default()
            .extend(fields);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn check_merge_replaces_only_provided_fields(store: &dyn DocumentStore) {
        assert!(store.get("ayse").unwrap().is_none());

        store
            .merge_set("ayse", doc(json!({"transactions": [1], "goals": ["car"]})))
            .unwrap();
        store
            .merge_set("ayse", doc(json!({"transactions": [1, 2]})))
            .unwrap();

        let stored = store.get("ayse").unwrap().unwrap();
        assert_eq!(Value::Object(stored), json!({"transactions": [1, 2], "goals": ["car"]}));
    }

    #[test]
    fn test_memory_merge_set() {
        check_merge_replaces_only_provided_fields(&MemoryDocumentStore::new());
    }

    #[test]
    fn test_file_merge_set() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path().join("remote"));
        check_merge_replaces_only_provided_fields(&store);
        assert!(store.dir().join("ayse.json").exists());
    }

    #[test]
    fn test_documents_are_per_user() {
        let store = MemoryDocumentStore::new();
        store.merge_set("ayse", doc(json!({"notes": ["a"]}))).unwrap();
        assert!(store.get("mehmet").unwrap().is_none());
    }

    #[test]
    fn test_offline_store_fails() {
        let store = MemoryDocumentStore::new();
        store.set_offline(true);
        assert!(matches!(store.get("ayse"), Err(BudgetError::Remote(_))));
        assert!(store.merge_set("ayse", Document::new()).is_err());

        store.set_offline(false);
        assert!(store.get("ayse").unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path());
        assert!(store.get("../escape").is_err());
    }

    #[test]
    fn test_corrupt_file_is_remote_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("ayse.json"), "garbage").unwrap();
        let store = FileDocumentStore::new(temp_dir.path());
        assert!(matches!(store.get("ayse"), Err(BudgetError::Remote(_))));
    }
}
