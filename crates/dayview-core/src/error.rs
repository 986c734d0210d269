//! Centralized error types for the Dayview foundation crate.
//!
//! Gateway-specific errors (calendar, tasks, auth HTTP) live in their own
//! crates; this module covers configuration and local storage, plus the
//! top-level `AppError` consumers can funnel everything into.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors (missing file, parse failures, invalid values).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at {0}")]
    NotFound(String),

    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file is missing.",
            ConfigError::ParseFailed(_) => "Configuration file could not be read.",
            ConfigError::Invalid(_) => "Configuration contains an invalid value.",
        }
    }
}

/// Local key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read store: {0}")]
    ReadFailed(String),

    #[error("Failed to write store: {0}")]
    WriteFailed(String),

    #[error("Store file is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::ReadFailed(_) => "Could not read local data.",
            StorageError::WriteFailed(_) => "Could not save local data.",
            StorageError::Corrupt(_) => "Local data is corrupt and was ignored.",
        }
    }
}
