//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bridge.name is required")]
    MissingBridgeName,
    #[error("database.path is empty")]
    EmptyDatabasePath,
    #[error("permissions.{0} grants no roles")]
    EmptyPermission(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bridge.name.trim().is_empty() {
        errors.push(ValidationError::MissingBridgeName);
    }

    // Missing parent directories are created when the database is opened.
    if let Some(ref db) = config.database
        && db.path.trim().is_empty()
    {
        errors.push(ValidationError::EmptyDatabasePath);
    }

    let mut empty: Vec<&String> = config
        .permissions
        .iter()
        .filter(|(_, roles)| roles.is_empty())
        .map(|(name, _)| name)
        .collect();
    empty.sort();
    errors.extend(
        empty
            .into_iter()
            .map(|name| ValidationError::EmptyPermission(name.clone())),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
