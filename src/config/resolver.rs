//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (and their environment variables, which clap folds in)
//! 2. config.kdl (`--config`, or `~/.config/taskmate/config.kdl`)
//! 3. Built-in defaults

use crate::config::TaskmateConfig;
use crate::i18n::Locale;
use crate::{Error, Result};
use chrono::Duration;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SESSION_TTL_HOURS: u32 = 336;
pub const DEFAULT_PASSWORD_MIN_LENGTH: u32 = 3;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag or its environment variable
    CliFlag,
    /// Value from the config file at this path
    ConfigFile(PathBuf),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::ConfigFile(path) => write!(f, "file:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }

    /// Pick the first present value: CLI override, then file, then default.
    fn pick(cli: Option<T>, file: Option<T>, file_path: Option<&Path>, default: T) -> Self {
        match (cli, file, file_path) {
            (Some(v), _, _) => Self::new(v, ValueSource::CliFlag),
            (None, Some(v), Some(path)) => {
                Self::new(v, ValueSource::ConfigFile(path.to_path_buf()))
            }
            _ => Self::new(default, ValueSource::Default),
        }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub host: Resolved<String>,
    pub port: Resolved<u16>,
    pub database: Resolved<PathBuf>,
    pub language: Resolved<Locale>,
    pub session_ttl_hours: Resolved<u32>,
    pub password_min_length: Resolved<u32>,
    pub secure_cookies: Resolved<bool>,
    pub log_level: Resolved<String>,
    /// Config file that was read, if any
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.session_ttl_hours.value))
    }

    pub fn database_path(&self) -> &Path {
        &self.database.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Default location of config.kdl.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("taskmate").join("config.kdl"))
}

/// Default database location, falling back to the working directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("taskmate").join("taskmate.db"))
        .unwrap_or_else(|| PathBuf::from("taskmate.db"))
}

/// Read and validate a config file.
pub fn read_config_file(path: &Path) -> Result<TaskmateConfig> {
    let content = fs::read_to_string(path)?;
    let doc: kdl::KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let config = TaskmateConfig::from_kdl(&doc)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    config
        .validate()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

/// Locate and read the config file.
///
/// An explicitly requested file must exist; the default location is
/// optional.
pub fn load_config(explicit: Option<&Path>) -> Result<(TaskmateConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok((TaskmateConfig::default(), None)),
        },
    };

    let config = read_config_file(&path)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok((config, Some(path)))
}

/// Resolve configuration with full precedence chain.
pub fn resolve_config(
    file: &TaskmateConfig,
    file_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    ResolvedConfig {
        host: Resolved::pick(
            overrides.host.clone(),
            file.host.clone(),
            file_path,
            DEFAULT_HOST.to_string(),
        ),
        port: Resolved::pick(overrides.port, file.port, file_path, DEFAULT_PORT),
        database: Resolved::pick(
            overrides.database.clone(),
            file.database.clone(),
            file_path,
            default_database_path(),
        ),
        language: Resolved::pick(None, file.language, file_path, Locale::default()),
        session_ttl_hours: Resolved::pick(
            None,
            file.session_ttl_hours,
            file_path,
            DEFAULT_SESSION_TTL_HOURS,
        ),
        password_min_length: Resolved::pick(
            None,
            file.password_min_length,
            file_path,
            DEFAULT_PASSWORD_MIN_LENGTH,
        ),
        secure_cookies: Resolved::pick(None, file.secure_cookies, file_path, false),
        log_level: Resolved::pick(
            None,
            file.log_level.clone(),
            file_path,
            DEFAULT_LOG_LEVEL.to_string(),
        ),
        config_file: file_path.map(Path::to_path_buf),
    }
}

/// Load the config file and resolve it against CLI overrides.
pub fn resolve(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let (file, path) = load_config(explicit)?;
    Ok(resolve_config(&file, path.as_deref(), overrides))
}
