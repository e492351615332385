//! Audit logging system for BudgetVault
//!
//! Records exports, imports, restores, syncs and edits in an append-only
//! JSON-lines log.
//!
//! - `AuditEntry`: timestamp, operation, user, affected fields and an
//!   optional detail string
//! - `AuditLogger`: appends entries to the log file and reads them back
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetvault::audit::{AuditEntry, AuditLogger, Operation};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::new(Operation::Export, "ayse")
//!     .with_fields(&SnapshotField::ALL)
//!     .with_detail(path.display().to_string());
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
