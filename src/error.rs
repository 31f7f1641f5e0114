//! Error types for the editor shell core.

use thiserror::Error;

/// Local key-value storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded writing {key}: needed {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("Unsupported version {found} for stored entry {key}")]
    UnsupportedVersion { key: String, found: u32 },

    #[error("Stored value for {0} is not valid UTF-8")]
    InvalidEncoding(String),
}

/// Repository import failures
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid repository format: {0}")]
    InvalidRepository(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Authentication required for {0}")]
    AuthRequired(String),

    #[error("Rate limit exceeded or access denied: {0}")]
    AccessDenied(String),

    #[error("Failed to fetch {stage}: {message}")]
    FetchFailed { stage: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    pub fn fetch_failed(stage: impl Into<String>, message: impl ToString) -> Self {
        ImportError::FetchFailed {
            stage: stage.into(),
            message: message.to_string(),
        }
    }
}

/// Top-level error surfaced to shell callers
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Parent folder not found: {0}")]
    ParentNotFound(String),

    #[error("Not a file: {0}")]
    FileNotFound(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("An entry already exists at {0}")]
    AlreadyExists(String),

    #[error("Cannot move {from} into {to}")]
    InvalidMove { from: String, to: String },

    #[error("Operation not permitted on the project root: {0}")]
    RootOperation(String),

    #[error("Unsaved changes in {0}")]
    UnsavedChanges(String),

    #[error("No project is open")]
    NoProject,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid search pattern: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}
