//! Audit log CLI command

use crate::audit::AuditLogger;
use crate::config::paths::VaultPaths;
use crate::error::BudgetResult;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(paths: &VaultPaths, limit: usize) -> BudgetResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!("Showing {} of {} entries", entries.len(), logger.entry_count()?);

    Ok(())
}
