//! Storage layer for BudgetVault
//!
//! Provides atomic JSON file storage, the device-local cache, the remote
//! document store and the `BudgetStore` that reconciles the two.

pub mod budget_store;
pub mod document_store;
pub mod file_io;
pub mod local_cache;

pub use budget_store::{BudgetStore, RefreshOutcome, RemoteStatus, SaveOutcome};
pub use document_store::{Document, DocumentStore, FileDocumentStore, MemoryDocumentStore};
pub use file_io::{read_json, write_json_atomic, write_text_atomic};
pub use local_cache::{FileKeyValueStore, KeyValueStore, LocalCache, MemoryKeyValueStore};
