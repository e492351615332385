//! Password input
//!
//! Passwords come from `BUDGETVAULT_PASSWORD` when set (for scripts),
//! otherwise from a hidden terminal prompt. They are held in `SecureString`
//! so the buffer is wiped when dropped.

use crate::crypto::SecureString;
use crate::error::{BudgetError, BudgetResult};

/// Environment variable supplying the backup password non-interactively
pub const PASSWORD_ENV: &str = "BUDGETVAULT_PASSWORD";

const MAX_ATTEMPTS: usize = 3;

fn password_from_env() -> Option<SecureString> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(SecureString::new)
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> BudgetResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| BudgetError::Io(format!("Failed to read password: {}", e)))
}

/// Password for opening an existing backup
pub fn read_password() -> BudgetResult<SecureString> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }

    let password = prompt_password("Backup password: ")?;
    if password.is_empty() {
        return Err(BudgetError::Validation("Password must not be empty".into()));
    }
    Ok(password)
}

/// Password for a new backup, typed twice
pub fn read_new_password() -> BudgetResult<SecureString> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }

    for _ in 0..MAX_ATTEMPTS {
        let first = prompt_password("New backup password: ")?;
        if first.is_empty() {
            eprintln!("Password must not be empty. Please try again.");
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if first != second {
            eprintln!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }

    Err(BudgetError::Validation(
        "No matching password entered".into(),
    ))
}
