//! Configuration
//!
//! Layered settings for storage, repository import, auto-save, tree
//! behaviour and logging. See [`ConfigLoader`] for source precedence.

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::error::ShellError;
use crate::logging::LoggingConfig;
use crate::tree::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub autosave: AutosaveConfig,
    pub tree: TreeConfig,
    pub logging: LoggingConfig,
}

/// Storage backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sled,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Store directory; None means `<data_home>/codeshell/store`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_path(&self) -> Result<PathBuf, ShellError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        paths::xdg_root::default_store_path()
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_max_file_size() -> u64 {
    100_000
}

fn default_batch_size() -> usize {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("codeshell/{}", env!("CARGO_PKG_VERSION"))
}

/// Repository import settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer token; falls back to `GITHUB_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Files at or above this many bytes get a placeholder instead of content
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Blob requests in flight at once
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            max_file_size: default_max_file_size(),
            batch_size: default_batch_size(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ImportConfig {
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_ms() -> u64 {
    3000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl AutosaveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub collision: CollisionPolicy,
    /// Whether UI callers should confirm before deleting
    pub confirm_delete: bool,
}
