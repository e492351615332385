//! Encrypted backups for BudgetVault
//!
//! - `BackupManager` encrypts snapshots into `.enc` files, lists them and
//!   opens backup files from any path
//! - `restore` applies a decrypted snapshot to the user's stored budget
//!
//! # Backup Format
//!
//! A backup file holds one line of standard base64 text. Decoded, it is the
//! 16-byte PBKDF2 salt, the 12-byte AES-GCM nonce, then the ciphertext with
//! its 16-byte tag. The plaintext is the snapshot as camelCase JSON with
//! `exportDate` and `version` set.
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetvault::backup::{restore, BackupManager};
//!
//! let manager = BackupManager::new(paths.backup_dir(), "ayse");
//! let path = manager.export(&snapshot, &password, None)?;
//!
//! // Later, on another device
//! let backup = manager.read_backup(&path, &password)?;
//! let result = restore(&store, backup)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupInfo, BackupManager};
pub use restore::{apply_backup, restore, RestoreResult};
