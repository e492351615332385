//! Configuration module for BudgetVault
//!
//! This module provides configuration management including:
//! - Base directory resolution with an environment override
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::Settings;
