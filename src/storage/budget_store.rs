//! Reconciliation of the local cache and the remote document
//!
//! The local cache is the source of truth for reads; the remote document is
//! consulted on refresh and mirrored on every save. An unreachable remote is
//! reported, never fatal.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{Settings, VaultPaths};
use crate::error::BudgetResult;
use crate::models::{Snapshot, SnapshotField};

use super::document_store::{Document, DocumentStore, FileDocumentStore};
use super::local_cache::{FileKeyValueStore, KeyValueStore, LocalCache};

/// What happened on the remote side of an operation
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteStatus {
    /// No remote store configured
    Disabled,
    /// The remote answered
    Synced,
    /// The remote failed; local state is intact
    Offline(String),
}

impl RemoteStatus {
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline(_))
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "remote disabled"),
            Self::Synced => write!(f, "synced"),
            Self::Offline(reason) => write!(f, "offline ({})", reason),
        }
    }
}

/// Result of pulling the remote document
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub status: RemoteStatus,
    /// Fields whose remote value replaced the local one
    pub adopted: Vec<SnapshotField>,
}

/// Result of persisting fields
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub fields: Vec<SnapshotField>,
    pub remote: RemoteStatus,
}

/// A user's budget, backed by the local cache and an optional remote
pub struct BudgetStore {
    cache: LocalCache,
    remote: Option<Arc<dyn DocumentStore>>,
}

impl BudgetStore {
    pub fn new(cache: LocalCache, remote: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { cache, remote }
    }

    /// File-backed store for the configured user
    pub fn open(paths: &VaultPaths, settings: &Settings) -> BudgetResult<Self> {
        let username = settings.require_username()?;
        let kv: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::open(paths.local_cache_file())?);
        let remote: Option<Arc<dyn DocumentStore>> = if settings.remote.enabled {
            Some(Arc::new(FileDocumentStore::new(settings.remote_dir(paths))))
        } else {
            None
        };

        Ok(Self::new(LocalCache::new(kv, username), remote))
    }

    pub fn username(&self) -> &str {
        self.cache.username()
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Snapshot as the local cache has it
    pub fn load(&self) -> BudgetResult<Snapshot> {
        self.cache.load_snapshot()
    }

    /// Adopt every non-empty remote field into `snapshot` and the cache
    ///
    /// Empty remote fields never overwrite local data. Errors from the
    /// remote become `RemoteStatus::Offline`; only local write failures are
    /// returned as errors.
    pub fn refresh_from_remote(&self, snapshot: &mut Snapshot) -> BudgetResult<RefreshOutcome> {
        let Some(remote) = &self.remote else {
            return Ok(RefreshOutcome {
                status: RemoteStatus::Disabled,
                adopted: Vec::new(),
            });
        };

        let document = match remote.get(self.username()) {
            Ok(document) => document.unwrap_or_default(),
            Err(e) => {
                warn!(user = self.username(), error = %e, "remote refresh failed, keeping local data");
                return Ok(RefreshOutcome {
                    status: RemoteStatus::Offline(e.to_string()),
                    adopted: Vec::new(),
                });
            }
        };

        let mut adopted = Vec::new();
        for field in SnapshotField::ALL {
            let Some(value) = document.get(field.document_key()) else {
                continue;
            };
            if !field.has_content(value) {
                continue;
            }
            if let Err(e) = snapshot.set_field(field, value.clone()) {
                warn!(field = %field, error = %e, "remote value has the wrong shape");
                continue;
            }
            self.cache.store_field(snapshot, field)?;
            adopted.push(field);
        }

        info!(user = self.username(), adopted = adopted.len(), "refreshed from remote");
        Ok(RefreshOutcome {
            status: RemoteStatus::Synced,
            adopted,
        })
    }

    /// Load from the cache, then refresh from the remote
    pub fn load_and_refresh(&self) -> BudgetResult<(Snapshot, RefreshOutcome)> {
        let mut snapshot = self.load()?;
        let outcome = self.refresh_from_remote(&mut snapshot)?;
        Ok((snapshot, outcome))
    }

    /// Persist one field locally, then mirror it to the remote
    pub fn save_field(&self, snapshot: &Snapshot, field: SnapshotField) -> BudgetResult<SaveOutcome> {
        self.save_fields(snapshot, &[field])
    }

    /// Persist every field locally, then mirror them to the remote
    pub fn save_all(&self, snapshot: &Snapshot) -> BudgetResult<SaveOutcome> {
        self.save_fields(snapshot, &SnapshotField::ALL)
    }

    fn save_fields(&self, snapshot: &Snapshot, fields: &[SnapshotField]) -> BudgetResult<SaveOutcome> {
        for &field in fields {
            self.cache.store_field(snapshot, field)?;
        }
        debug!(user = self.username(), fields = fields.len(), "saved to local cache");

        let remote = self.push(snapshot, fields)?;
        Ok(SaveOutcome {
            fields: fields.to_vec(),
            remote,
        })
    }

    fn push(&self, snapshot: &Snapshot, fields: &[SnapshotField]) -> BudgetResult<RemoteStatus> {
        let Some(remote) = &self.remote else {
            return Ok(RemoteStatus::Disabled);
        };

        let mut document = Document::new();
        for &field in fields {
            document.insert(field.document_key().to_string(), snapshot.field_value(field)?);
        }

        match remote.merge_set(self.username(), document) {
            Ok(()) => Ok(RemoteStatus::Synced),
            Err(e) => {
                warn!(user = self.username(), error = %e, "remote save failed, kept local copy");
                Ok(RemoteStatus::Offline(e.to_string()))
            }
        }
    }
}
