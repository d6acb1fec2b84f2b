//! Data models for Taskmate entities.
//!
//! This module defines the core data structures:
//! - `User` - Registered account (credentials live only in storage)
//! - `Status` - Workflow state every task must carry
//! - `Label` - Free-form tag attached to tasks through a join table
//! - `Task` - Work item, hydrated with its status, people and labels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of status, label and task names.
pub const NAME_MAX_LENGTH: usize = 100;

/// Maximum length of usernames and personal names.
pub const USER_FIELD_MAX_LENGTH: usize = 150;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full name as shown in lists and selects.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Data needed to insert a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Validated replacement values for an existing user.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// New password hash, if the password is being changed
    pub password_hash: Option<String>,
}

/// A task status such as "new" or "in progress".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A label that can be attached to any number of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A work item with its references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    /// Free text, empty when not provided
    pub description: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<User>,
    /// Author of the task; fixed at creation
    pub created_by: User,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
}


impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validated values for creating or updating a task.
///
/// There is deliberately no author field: the author is supplied by the
/// caller from the authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub name: String,
    pub description: String,
    pub status_id: i64,
    pub executor_id: Option<i64>,
    pub label_ids: Vec<i64>,
}
