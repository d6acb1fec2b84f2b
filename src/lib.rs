//! Taskmate - a server-rendered task tracker.
//!
//! This library provides the core functionality for the `taskmate` binary:
//! the SQLite-backed store for users, statuses, labels and tasks, the form
//! validation layer, and the axum web application with its authentication,
//! ownership and referential-integrity guards.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod forms;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod storage;
pub mod web;

use std::path::PathBuf;


/// Library-level error type for Taskmate operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not initialized: no database at {}, run `taskmate init` first", .0.display())]
    NotInitialized(PathBuf),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A delete was refused because other rows still reference the target.
    #[error("Protected: {0} is still referenced")]
    Protected(String),

    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Taskmate operations.
pub type Result<T> = std::result::Result<T, Error>;
