//! Backup manager for BudgetVault
//!
//! Writes encrypted snapshots to `.enc` files, lists the backups in the
//! backup directory and opens backup files from anywhere.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::crypto::{BackupCodec, KeyDerivation, OsRandom, Pbkdf2Sha256, RandomSource};
use crate::error::{BudgetError, BudgetResult};
use crate::models::Snapshot;
use crate::storage::write_text_atomic;

const FILE_PREFIX: &str = "budget_backup_";
const FILE_EXTENSION: &str = "enc";

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// User the backup was exported for
    pub username: String,
    /// When the backup was created, parsed from the filename
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Creates, lists and opens encrypted backups
pub struct BackupManager<R = OsRandom, K = Pbkdf2Sha256> {
    backup_dir: PathBuf,
    username: String,
    codec: BackupCodec<R, K>,
}

impl BackupManager {
    /// Create a manager using the OS random source and PBKDF2
    pub fn new(backup_dir: impl Into<PathBuf>, username: impl Into<String>) -> Self {
        Self::with_codec(backup_dir, username, BackupCodec::new())
    }
}

impl<R: RandomSource, K: KeyDerivation> BackupManager<R, K> {
    pub fn with_codec(
        backup_dir: impl Into<PathBuf>,
        username: impl Into<String>,
        codec: BackupCodec<R, K>,
    ) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            username: username.into(),
            codec,
        }
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// `budget_backup_{user}_{YYYYMMDD-HHMMSS-mmm}.enc`
    pub fn backup_filename(&self, at: DateTime<Utc>) -> String {
        format!(
            "{}{}_{}-{:03}.{}",
            FILE_PREFIX,
            self.username,
            at.format("%Y%m%d-%H%M%S"),
            at.timestamp_subsec_millis(),
            FILE_EXTENSION
        )
    }

    /// Encrypt `snapshot` and write it to `output`, or into the backup
    /// directory under a timestamped name
    ///
    /// Returns the path written.
    pub fn export(
        &self,
        snapshot: &Snapshot,
        password: &str,
        output: Option<&Path>,
    ) -> BudgetResult<PathBuf> {
        self.export_at(snapshot, password, output, Utc::now())
    }

    /// `export` with an explicit clock
    pub fn export_at(
        &self,
        snapshot: &Snapshot,
        password: &str,
        output: Option<&Path>,
        now: DateTime<Utc>,
    ) -> BudgetResult<PathBuf> {
        let payload = snapshot.for_export(now);
        let encoded = self.codec.encrypt(&payload, password)?;

        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self.backup_dir.join(self.backup_filename(now)),
        };
        write_text_atomic(&path, &encoded)?;

        info!(path = %path.display(), bytes = encoded.len(), "exported backup");
        Ok(path)
    }

    /// Decrypt a backup file
    ///
    /// The extension does not matter; a file is a backup if it decrypts.
    pub fn read_backup(&self, path: &Path, password: &str) -> BudgetResult<Snapshot> {
        if !path.exists() {
            return Err(BudgetError::backup_not_found(path.display().to_string()));
        }

        let bytes = fs::read(path)
            .map_err(|e| BudgetError::Io(format!("Failed to read backup file: {}", e)))?;
        let text = String::from_utf8(bytes).map_err(|_| BudgetError::Decryption)?;

        debug!(path = %path.display(), "decrypting backup");
        self.codec.decrypt(&text, password)
    }

    /// List all backups in the backup directory, newest first
    pub fn list_backups(&self) -> BudgetResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| BudgetError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Backups exported for this manager's user
    pub fn list_own_backups(&self) -> BudgetResult<Vec<BackupInfo>> {
        let mut backups = self.list_backups()?;
        backups.retain(|b| b.username == self.username);
        Ok(backups)
    }

    /// Get the most recent backup of this user
    pub fn get_latest_backup(&self) -> BudgetResult<Option<BackupInfo>> {
        Ok(self.list_own_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let stem = filename
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_EXTENSION)?
        .strip_suffix('.')?;
    let (username, stamp) = stem.rsplit_once('_')?;
    if username.is_empty() {
        return None;
    }
    let created_at = parse_backup_timestamp(stamp)?;

    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename: filename.clone(),
        path: path.to_path_buf(),
        username: username.to_string(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = match parts.get(2) {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }
    if !all_digits(date_part) || !all_digits(time_part) {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;

    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}
