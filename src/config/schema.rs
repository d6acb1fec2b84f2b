//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the file
//! - Serialization/deserialization to/from KDL format
//! - Validation

use crate::i18n::Locale;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest accepted session lifetime: ten years.
pub const MAX_SESSION_TTL_HOURS: u32 = 24 * 365 * 10;

/// Server settings stored in config.kdl.
///
/// Every field is optional; unset values fall through to CLI defaults.
///
/// # KDL Schema
///
/// ```kdl
/// host "127.0.0.1"
/// port 8000
/// database "/var/lib/taskmate/taskmate.db"
/// language "ru"
/// session-ttl-hours 336
/// password-min-length 3
/// secure-cookies #false
/// log-level "info"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskmateConfig {
    /// Address the web server binds to
    pub host: Option<String>,

    pub port: Option<u16>,

    /// SQLite database file
    pub database: Option<PathBuf>,

    /// Interface language used when the browser expresses no preference
    pub language: Option<Locale>,

    /// Lifetime of a browser session
    pub session_ttl_hours: Option<u32>,

    pub password_min_length: Option<u32>,

    /// Add the `Secure` attribute to the session cookie
    pub secure_cookies: Option<bool>,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: Option<String>,
}

fn first_entry<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn string_value(doc: &KdlDocument, name: &str) -> Result<Option<String>, String> {
    match first_entry(doc, name) {
        None => Ok(None),
        Some(value) => value
            .as_string()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| format!("{} must be a string", name)),
    }
}

fn integer_value<T: TryFrom<i128>>(doc: &KdlDocument, name: &str) -> Result<Option<T>, String> {
    match first_entry(doc, name) {
        None => Ok(None),
        Some(value) => {
            let raw = value
                .as_integer()
                .ok_or_else(|| format!("{} must be an integer", name))?;
            T::try_from(raw)
                .map(Some)
                .map_err(|_| format!("{} is out of range: {}", name, raw))
        }
    }
}

fn push_value(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}

impl TaskmateConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == Some(0) {
            return Err("port must be between 1 and 65535".to_string());
        }
        match self.session_ttl_hours {
            Some(0) => return Err("session-ttl-hours must be at least 1".to_string()),
            Some(hours) if hours > MAX_SESSION_TTL_HOURS => {
                return Err(format!(
                    "session-ttl-hours must be at most {}",
                    MAX_SESSION_TTL_HOURS
                ));
            }
            _ => {}
        }
        if let Some(ref host) = self.host {
            if host.trim().is_empty() {
                return Err("host must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes are ignored; known nodes with a value of the wrong
    /// type are reported.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self, String> {
        let mut config = Self::new();

        config.host = string_value(doc, "host")?;
        config.port = integer_value(doc, "port")?;
        config.database = string_value(doc, "database")?.map(PathBuf::from);

        if let Some(lang) = string_value(doc, "language")? {
            config.language = Some(
                Locale::parse(&lang).ok_or_else(|| format!("unsupported language: {}", lang))?,
            );
        }

        config.session_ttl_hours = integer_value(doc, "session-ttl-hours")?;
        config.password_min_length = integer_value(doc, "password-min-length")?;

        if let Some(value) = first_entry(doc, "secure-cookies") {
            config.secure_cookies = Some(
                value
                    .as_bool()
                    .ok_or_else(|| "secure-cookies must be #true or #false".to_string())?,
            );
        }

        config.log_level = string_value(doc, "log-level")?;

        Ok(config)
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref host) = self.host {
            push_value(&mut doc, "host", KdlValue::String(host.clone()));
        }
        if let Some(port) = self.port {
            push_value(&mut doc, "port", KdlValue::Integer(port as i128));
        }
        if let Some(ref database) = self.database {
            push_value(
                &mut doc,
                "database",
                KdlValue::String(database.display().to_string()),
            );
        }
        if let Some(language) = self.language {
            push_value(
                &mut doc,
                "language",
                KdlValue::String(language.as_str().to_string()),
            );
        }
        if let Some(hours) = self.session_ttl_hours {
            push_value(&mut doc, "session-ttl-hours", KdlValue::Integer(hours as i128));
        }
        if let Some(min) = self.password_min_length {
            push_value(&mut doc, "password-min-length", KdlValue::Integer(min as i128));
        }
        if let Some(secure) = self.secure_cookies {
            push_value(&mut doc, "secure-cookies", KdlValue::Bool(secure));
        }
        if let Some(ref level) = self.log_level {
            push_value(&mut doc, "log-level", KdlValue::String(level.clone()));
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &TaskmateConfig) {
        if other.host.is_some() {
            self.host = other.host.clone();
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.database.is_some() {
            self.database = other.database.clone();
        }
        if other.language.is_some() {
            self.language = other.language;
        }
        if other.session_ttl_hours.is_some() {
            self.session_ttl_hours = other.session_ttl_hours;
        }
        if other.password_min_length.is_some() {
            self.password_min_length = other.password_min_length;
        }
        if other.secure_cookies.is_some() {
            self.secure_cookies = other.secure_cookies;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kdl: &str) -> Result<TaskmateConfig, String> {
        let doc: KdlDocument = kdl.parse().unwrap();
        TaskmateConfig::from_kdl(&doc)
    }

    #[test]
    fn test_config_from_kdl_empty() {
        assert_eq!(parse("").unwrap(), TaskmateConfig::default());
    }

    #[test]
    fn test_config_from_kdl_full() {
        let config = parse(
            r#"
            host "0.0.0.0"
            port 8080
            database "/tmp/tm.db"
            language "ru"
            session-ttl-hours 24
            password-min-length 8
            secure-cookies #true
            log-level "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.database, Some(PathBuf::from("/tmp/tm.db")));
        assert_eq!(config.language, Some(Locale::Ru));
        assert_eq!(config.session_ttl_hours, Some(24));
        assert_eq!(config.password_min_length, Some(8));
        assert_eq!(config.secure_cookies, Some(true));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_config_ignores_unknown_nodes() {
        let config = parse("editor \"vim\"\nport 9000").unwrap();
        assert_eq!(config.port, Some(9000));
    }

    #[test]
    fn test_config_rejects_wrong_types() {
        assert!(parse("port \"eighty\"").is_err());
        assert!(parse("port 70000").is_err());
        assert!(parse("language \"de\"").is_err());
        assert!(parse("secure-cookies \"yes\"").is_err());
    }

    #[test]
    fn test_config_validate() {
        assert!(TaskmateConfig::default().validate().is_ok());

        let config = TaskmateConfig {
            port: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TaskmateConfig {
            session_ttl_hours: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TaskmateConfig {
            session_ttl_hours: Some(MAX_SESSION_TTL_HOURS),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = TaskmateConfig {
            session_ttl_hours: Some(u32::MAX),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("at most 87600"));
    }

    #[test]
    fn test_config_to_kdl_roundtrip() {
        let config = TaskmateConfig {
            host: Some("localhost".to_string()),
            port: Some(8000),
            database: Some(PathBuf::from("data/tm.db")),
            language: Some(Locale::En),
            session_ttl_hours: Some(12),
            password_min_length: Some(4),
            secure_cookies: Some(false),
            log_level: Some("warn".to_string()),
        };

        let doc = config.to_kdl();
        let reparsed: KdlDocument = doc.to_string().parse().unwrap();
        assert_eq!(TaskmateConfig::from_kdl(&reparsed).unwrap(), config);
    }

    #[test]
    fn test_config_merge() {
        let mut base = TaskmateConfig {
            host: Some("127.0.0.1".to_string()),
            port: Some(8000),
            ..Default::default()
        };
        let other = TaskmateConfig {
            port: Some(9000),
            language: Some(Locale::Ru),
            ..Default::default()
        };

        base.merge(&other);

        assert_eq!(base.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(base.port, Some(9000));
        assert_eq!(base.language, Some(Locale::Ru));
    }
}
