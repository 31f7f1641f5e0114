//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::ShellConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence (lowest first): built-in defaults, the global file
    /// `<config_home>/codeshell/config.toml`, `explicit` if given, then
    /// `CODESHELL__SECTION__KEY` environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<ShellConfig, ConfigError> {
        MergeService::load(explicit)
    }

    /// Load configuration from a specific file, skipping the global file.
    pub fn load_from_file(path: &Path) -> Result<ShellConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> ShellConfig {
        ShellConfig::default()
    }
}
