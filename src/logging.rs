//! Logging System
//!
//! Structured logging through `tracing`. Level, format and destination come
//! from [`LoggingConfig`] and may be overridden by `CODESHELL_LOG*`
//! environment variables.

use crate::error::ShellError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "CODESHELL_LOG";
const ENV_FORMAT: &str = "CODESHELL_LOG_FORMAT";
const ENV_OUTPUT: &str = "CODESHELL_LOG_OUTPUT";
const ENV_FILE: &str = "CODESHELL_LOG_FILE";

/// Line format of emitted events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ShellError::ConfigError(format!(
                "Invalid log format: {} (expected text or json)",
                other
            ))),
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[default]
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    #[serde(rename = "both")]
    Both,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, Self::File | Self::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            "file" => Ok(Self::File),
            "file+stderr" => Ok(Self::FileAndStderr),
            "both" => Ok(Self::Both),
            other => Err(ShellError::ConfigError(format!(
                "Invalid log output: {} (expected stdout, stderr, file, file+stderr or both)",
                other
            ))),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::FileAndStderr => "file+stderr",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

/// `[logging]` configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// trace, debug, info, warn, error or off
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Log file when output includes a file; platform state dir otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// ANSI colours for text output on a terminal
    pub color: bool,
    /// Per-module level overrides, e.g. `codeshell::remote = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Pick the log file: explicit path, then `CODESHELL_LOG_FILE`, then the
/// configured one, then `codeshell.log` in the platform state directory.
pub fn resolve_log_file_path(
    explicit: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> Result<PathBuf, ShellError> {
    let from_env = std::env::var(ENV_FILE).ok().map(PathBuf::from);
    if let Some(path) = [explicit, from_env, configured]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
    {
        return Ok(path);
    }
    let dirs = directories::ProjectDirs::from("", "codeshell", "codeshell").ok_or_else(|| {
        ShellError::ConfigError("No platform state directory for the log file".to_string())
    })?;
    let state = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Ok(state.join("codeshell.log"))
}

/// Install the global subscriber.
///
/// Environment variables win over `config`; CLI flags are folded into
/// `config` by the caller. Fails if a subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ShellError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(install_error);
    }

    let filter = env_filter(config)?;
    let format = match std::env::var(ENV_FORMAT) {
        Ok(raw) => raw.parse()?,
        Err(_) => config.format,
    };
    let output = match std::env::var(ENV_OUTPUT) {
        Ok(raw) => raw.parse()?,
        Err(_) => config.output,
    };
    let writer = make_writer(output, config)?;

    let registry = Registry::default().with(filter);
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry
            .with(layer.with_ansi(config.color && !output.writes_file()))
            .try_init(),
    }
    .map_err(install_error)
}

fn install_error(e: impl fmt::Display) -> ShellError {
    ShellError::ConfigError(format!("Failed to install logger: {}", e))
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ShellError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    let mut filter = EnvFilter::new(&config.level);
    if config.level == "off" {
        return Ok(filter);
    }
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level)
            .parse()
            .map_err(|e| ShellError::ConfigError(format!("Invalid log directive: {}", e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

fn make_writer(output: LogOutput, config: &LoggingConfig) -> Result<BoxMakeWriter, ShellError> {
    Ok(match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File => BoxMakeWriter::new(open_log_file(config)?),
        LogOutput::FileAndStderr => {
            BoxMakeWriter::new(open_log_file(config)?.and(std::io::stderr))
        }
    })
}

fn open_log_file(config: &LoggingConfig) -> Result<Arc<File>, ShellError> {
    let path = resolve_log_file_path(None, config.file.clone())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ShellError::ConfigError(format!("Failed to create log directory: {}", e)))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ShellError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e)))?;
    Ok(Arc::new(file))
}
