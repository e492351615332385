//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`, so stdout stays clean for
//! `snapshot dump` and other piped output. The filter comes from
//! `BUDGETVAULT_LOG`, falling back to the `log_level` setting.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{BudgetError, BudgetResult};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "BUDGETVAULT_LOG";

/// Build the filter: `BUDGETVAULT_LOG` if set, otherwise `default_level`
pub fn build_filter(default_level: &str) -> BudgetResult<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
            .map_err(|e| BudgetError::Config(format!("Invalid {} '{}': {}", LOG_ENV, directive, e))),
        _ => EnvFilter::try_new(default_level).map_err(|e| {
            BudgetError::Config(format!("Invalid log level '{}': {}", default_level, e))
        }),
    }
}

/// Install the global subscriber
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(default_level: &str) -> BudgetResult<()> {
    let filter = build_filter(default_level)?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_filter() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        let filter = build_filter("debug").unwrap();
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn test_init_twice() {
        init("warn").unwrap();
        init("warn").unwrap();
    }
}
