//! Backup listing display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::BackupInfo;

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Table of backups in the order given
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.\n".to_string();
    }

    let rows: Vec<BackupRow> = backups
        .iter()
        .enumerate()
        .map(|(i, backup)| BackupRow {
            index: i + 1,
            filename: backup.filename.clone(),
            username: backup.username.clone(),
            created: backup.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            size: format_size(backup.size_bytes),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    format!("{}\nTotal: {} backup(s)\n", table, backups.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_backup_list() {
        let backups = vec![BackupInfo {
            filename: "budget_backup_ayse_20250101-090000-000.enc".into(),
            path: PathBuf::from("budget_backup_ayse_20250101-090000-000.enc"),
            username: "ayse".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
            size_bytes: 2048,
        }];

        let output = format_backup_list(&backups);
        assert!(output.contains("budget_backup_ayse_20250101-090000-000.enc"));
        assert!(output.contains("2025-01-01 09:00:00 UTC"));
        assert!(output.contains("2.0 KB"));
        assert!(output.contains("Total: 1 backup(s)"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_backup_list(&[]), "No backups found.\n");
    }
}
