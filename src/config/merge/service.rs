//! MergeService: orchestrates sources, applies merge policy, deserializes to ShellConfig.

use crate::config::sources::{environment, global_file};
use crate::config::ShellConfig;
use config::{ConfigError, File};
use std::path::Path;

use super::builder_with_defaults;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<ShellConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => builder.add_source(File::from(path.to_path_buf()).required(true)),
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ShellConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
