//! Merge policy: defaults seeded from [`ShellConfig::default`].

pub mod service;

use super::ShellConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};

/// Builder whose lowest layer is the serialized default configuration.
pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = toml::to_string(&ShellConfig::default())
        .map_err(|e| ConfigError::Message(format!("Failed to encode defaults: {}", e)))?;
    Ok(Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml)))
}
