//! Configuration management for Taskmate.
//!
//! ## config.kdl
//!
//! Located at `~/.config/taskmate/config.kdl` unless `--config` (or
//! `TASKMATE_CONFIG`) points elsewhere. Contains:
//! - `host`, `port` - Web server bind address
//! - `database` - SQLite database file
//! - `language` - Fallback interface language ("en" or "ru")
//! - `session-ttl-hours` - Browser session lifetime
//! - `password-min-length` - Minimum accepted password length
//! - `secure-cookies` - Mark the session cookie `Secure`
//! - `log-level` - Default tracing filter
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, default_config_path,
    default_database_path, load_config, resolve, resolve_config,
};
pub use schema::TaskmateConfig;
