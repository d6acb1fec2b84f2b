//! Command implementations for the Taskmate CLI.
//!
//! This module contains the logic behind each management command:
//! - `init` - Create the database
//! - `user_*` - Register and list users
//! - `status_*`, `label_*` - Seed the catalogs tasks draw from
//! - `config_show` - Report the resolved configuration
//!
//! Input goes through the same form validation as the web pages.

use serde::Serialize;
use std::path::Path;

use crate::config::ResolvedConfig;
use crate::forms::{FormErrors, NameForm, UserForm};
use crate::i18n::Locale;
use crate::models::{Label, NewUser, Status, User};
use crate::storage::Storage;
use crate::{Error, Result, auth};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Flatten form errors into one message.
fn invalid_input(errors: &FormErrors, fields: &[&'static str]) -> Error {
    let messages: Vec<String> = fields
        .iter()
        .flat_map(|field| {
            errors
                .field(field)
                .into_iter()
                .map(move |e| format!("{}: {}", field, e.text(Locale::En)))
        })
        .collect();
    Error::InvalidInput(messages.join("; "))
}

// === init ===

#[derive(Serialize)]
pub struct InitResult {
    pub database: String,
    /// False when the database already existed
    pub created: bool,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.created {
            format!("Initialized taskmate database at {}", self.database)
        } else {
            format!("Database already initialized at {}", self.database)
        }
    }
}

/// Create the database file and schema.
pub fn init(database: &Path) -> Result<InitResult> {
    let created = !Storage::exists(database);
    Storage::init(database)?;
    if created {
        tracing::info!(path = %database.display(), "database created");
    }
    Ok(InitResult {
        database: database.display().to_string(),
        created,
    })
}

// === users ===

#[derive(Serialize)]
pub struct UserCreated {
    pub user: User,
}

impl Output for UserCreated {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!(
            "Created user #{} {} ({})",
            self.user.id,
            self.user.username,
            self.user.full_name()
        )
    }
}

/// Register a user; the password is hashed before it is stored.
pub fn user_create(
    database: &Path,
    username: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
    password_min_length: usize,
) -> Result<UserCreated> {
    let mut storage = Storage::open(database)?;

    let form = UserForm {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        username: username.trim().to_string(),
        password1: password.to_string(),
        password2: password.to_string(),
    };
    let valid = form
        .clean(&storage, None, password_min_length)?
        .map_err(|errors| {
            invalid_input(
                &errors,
                &["first_name", "last_name", "username", "password1", "password2"],
            )
        })?;

    let user = storage.create_user(&NewUser {
        password_hash: auth::hash_password(&valid.password)?,
        username: valid.username,
        first_name: valid.first_name,
        last_name: valid.last_name,
    })?;
    Ok(UserCreated { user })
}

#[derive(Serialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub count: usize,
}

impl Output for UserList {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.users.is_empty() {
            return "No users.".to_string();
        }
        let mut lines = vec![format!("{} user(s):", self.count)];
        for user in &self.users {
            lines.push(format!(
                "  #{} {} - {}",
                user.id,
                user.username,
                user.full_name()
            ));
        }
        lines.join("\n")
    }
}

pub fn user_list(database: &Path) -> Result<UserList> {
    let storage = Storage::open(database)?;
    let users = storage.list_users()?;
    Ok(UserList {
        count: users.len(),
        users,
    })
}

// === statuses and labels ===

/// A created status or label.
#[derive(Serialize)]
pub struct NamedCreated<T: Serialize> {
    #[serde(skip)]
    pub kind: &'static str,
    #[serde(flatten)]
    pub item: T,
}

impl Output for NamedCreated<Status> {
    fn to_json(&self) -> String {
        serde_json::to_string(&self.item).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!("Created {} #{} {}", self.kind, self.item.id, self.item.name)
    }
}

impl Output for NamedCreated<Label> {
    fn to_json(&self) -> String {
        serde_json::to_string(&self.item).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!("Created {} #{} {}", self.kind, self.item.id, self.item.name)
    }
}

#[derive(Serialize)]
pub struct StatusList {
    pub statuses: Vec<Status>,
    pub count: usize,
}

impl Output for StatusList {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.statuses.is_empty() {
            return "No statuses.".to_string();
        }
        let mut lines = vec![format!("{} status(es):", self.count)];
        for status in &self.statuses {
            lines.push(format!("  #{} {}", status.id, status.name));
        }
        lines.join("\n")
    }
}

#[derive(Serialize)]
pub struct LabelList {
    pub labels: Vec<Label>,
    pub count: usize,
}

impl Output for LabelList {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.labels.is_empty() {
            return "No labels.".to_string();
        }
        let mut lines = vec![format!("{} label(s):", self.count)];
        for label in &self.labels {
            lines.push(format!("  #{} {}", label.id, label.name));
        }
        lines.join("\n")
    }
}

fn clean_name(
    name: &str,
    is_taken: impl FnOnce(&str) -> Result<bool>,
) -> Result<String> {
    let form = NameForm {
        name: name.trim().to_string(),
    };
    form.clean(is_taken)?
        .map_err(|errors| invalid_input(&errors, &["name"]))
}

pub fn status_create(database: &Path, name: &str) -> Result<NamedCreated<Status>> {
    let mut storage = Storage::open(database)?;
    let name = clean_name(name, |n| storage.status_name_taken(n, None))?;
    Ok(NamedCreated {
        kind: "status",
        item: storage.create_status(&name)?,
    })
}

pub fn status_list(database: &Path) -> Result<StatusList> {
    let storage = Storage::open(database)?;
    let statuses = storage.list_statuses()?;
    Ok(StatusList {
        count: statuses.len(),
        statuses,
    })
}

pub fn label_create(database: &Path, name: &str) -> Result<NamedCreated<Label>> {
    let mut storage = Storage::open(database)?;
    let name = clean_name(name, |n| storage.label_name_taken(n, None))?;
    Ok(NamedCreated {
        kind: "label",
        item: storage.create_label(&name)?,
    })
}

pub fn label_list(database: &Path) -> Result<LabelList> {
    let storage = Storage::open(database)?;
    let labels = storage.list_labels()?;
    Ok(LabelList {
        count: labels.len(),
        labels,
    })
}

// === config ===

#[derive(Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

#[derive(Serialize)]
pub struct ConfigShow {
    pub config_file: Option<String>,
    pub values: Vec<ConfigEntry>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let mut lines = vec![match self.config_file {
            Some(ref path) => format!("Config file: {}", path),
            None => "Config file: (none)".to_string(),
        }];
        for entry in &self.values {
            lines.push(format!(
                "  {} = {}  [{}]",
                entry.key, entry.value, entry.source
            ));
        }
        lines.join("\n")
    }
}

/// Report every resolved setting with its source.
pub fn config_show(config: &ResolvedConfig) -> ConfigShow {
    fn entry<T: ToString>(
        key: &'static str,
        resolved: &crate::config::Resolved<T>,
    ) -> ConfigEntry {
        ConfigEntry {
            key,
            value: resolved.value.to_string(),
            source: resolved.source.to_string(),
        }
    }

    ConfigShow {
        config_file: config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string()),
        values: vec![
            entry("host", &config.host),
            entry("port", &config.port),
            ConfigEntry {
                key: "database",
                value: config.database.value.display().to_string(),
                source: config.database.source.to_string(),
            },
            entry("language", &config.language),
            entry("session-ttl-hours", &config.session_ttl_hours),
            entry("password-min-length", &config.password_min_length),
            entry("secure-cookies", &config.secure_cookies),
            entry("log-level", &config.log_level),
        ],
    }
}
