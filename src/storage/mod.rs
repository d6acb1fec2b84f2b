//! Storage layer for Taskmate data.
//!
//! This module handles persistence of users, statuses, labels, tasks and
//! browser sessions in a single SQLite database.
//!
//! ## Referential integrity
//!
//! Foreign keys are enforced (`PRAGMA foreign_keys = ON`). References from
//! tasks to statuses, labels and users are `ON DELETE RESTRICT`: deleting a
//! referenced row fails and is reported as [`Error::Protected`], leaving
//! every row untouched. Task-label join rows cascade with their task.
//!
//! ## Sessions and notices
//!
//! Sessions are keyed by the SHA-256 digest of the browser token. Queued
//! notices hang off a session and are consumed by the next rendered page.

pub mod filter;

pub use filter::TaskFilter;

use crate::auth;
use crate::i18n::Notice;
use crate::models::{Label, NewUser, Status, Task, TaskInput, User, UserChanges};
use crate::{Error, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use std::fs;
use std::path::{Path, PathBuf};

/// Column list for a fully joined task row, see [`task_from_row`].
const TASK_SELECT: &str = "
    SELECT t.id, t.name, t.description, t.created_at,
           s.id, s.name, s.created_at,
           a.id, a.username, a.first_name, a.last_name, a.created_at,
           e.id, e.username, e.first_name, e.last_name, e.created_at
    FROM tasks t
    JOIN statuses s ON s.id = t.status_id
    JOIN users a ON a.id = t.created_by
    LEFT JOIN users e ON e.id = t.executor_id";

const USER_COLUMNS: &str = "id, username, first_name, last_name, created_at";

/// A live browser session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Authenticated user, `None` for anonymous sessions
    pub user: Option<User>,
}

/// Storage manager wrapping one SQLite connection.
pub struct Storage {
    /// Database file, `None` for in-memory databases
    path: Option<PathBuf>,
    conn: Connection,
}

impl Storage {
    /// Open an existing database.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotInitialized(path.to_path_buf()));
        }
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn,
        })
    }

    /// Create the database file (and parent directories) if needed.
    pub fn init(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn,
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Self::init_schema(&conn)?;
        Ok(Self { path: None, conn })
    }

    /// Check if a database exists at the given path.
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Database file backing this storage, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// Initialize the SQLite schema.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS statuses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS labels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                status_id INTEGER NOT NULL REFERENCES statuses(id) ON DELETE RESTRICT,
                executor_id INTEGER REFERENCES users(id) ON DELETE RESTRICT,
                created_by INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS task_labels (
                task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                label_id INTEGER NOT NULL REFERENCES labels(id) ON DELETE RESTRICT,
                PRIMARY KEY (task_id, label_id)
            );

            CREATE TABLE IF NOT EXISTS sessions (
                digest TEXT PRIMARY KEY,
                user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_digest TEXT NOT NULL REFERENCES sessions(digest) ON DELETE CASCADE,
                notice TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_executor ON tasks(executor_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_created_by ON tasks(created_by);
            CREATE INDEX IF NOT EXISTS idx_task_labels_label ON task_labels(label_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_digest);
            "#,
        )?;
        Ok(())
    }

    // === User Operations ===

    /// Insert a new user.
    pub fn create_user(&mut self, user: &NewUser) -> Result<User> {
        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO users (username, first_name, last_name, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.username,
                    user.first_name,
                    user.last_name,
                    user.password_hash,
                    timestamp(&now),
                ],
            )
            .map_err(|e| write_error(e, format!("username {}", user.username)))?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id = id, username = %user.username, "user created");
        self.get_user(id)
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: i64) -> Result<User> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                [id],
                |row| user_from_row(row, 0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("User not found: {}", id)))
    }

    /// List all users in registration order.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], |row| user_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Look up a user and their stored password hash by username.
    pub fn find_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        let found = self
            .conn
            .query_row(
                &format!(
                    "SELECT {}, password_hash FROM users WHERE username = ?",
                    USER_COLUMNS
                ),
                [username],
                |row| Ok((user_from_row(row, 0)?, row.get::<_, String>(5)?)),
            )
            .optional()?;
        Ok(found)
    }

    /// Replace a user's editable fields.
    pub fn update_user(&mut self, id: i64, changes: &UserChanges) -> Result<User> {
        let changed = match &changes.password_hash {
            Some(hash) => self.conn.execute(
                "UPDATE users SET username = ?1, first_name = ?2, last_name = ?3, password_hash = ?4
                 WHERE id = ?5",
                params![
                    changes.username,
                    changes.first_name,
                    changes.last_name,
                    hash,
                    id
                ],
            ),
            None => self.conn.execute(
                "UPDATE users SET username = ?1, first_name = ?2, last_name = ?3 WHERE id = ?4",
                params![changes.username, changes.first_name, changes.last_name, id],
            ),
        }
        .map_err(|e| write_error(e, format!("username {}", changes.username)))?;

        if changed == 0 {
            return Err(Error::NotFound(format!("User not found: {}", id)));
        }
        tracing::info!(user_id = id, "user updated");
        self.get_user(id)
    }

    /// Delete a user; refused while any task references them.
    pub fn delete_user(&mut self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?", [id])
            .map_err(|e| delete_error(e, format!("user {}", id)))?;
        if changed == 0 {
            return Err(Error::NotFound(format!("User not found: {}", id)));
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Whether a username is used by a user other than `exclude`.
    pub fn username_taken(&self, username: &str, exclude: Option<i64>) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1 AND id != ?2",
            params![username, exclude.unwrap_or(-1)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // === Status Operations ===

    pub fn create_status(&mut self, name: &str) -> Result<Status> {
        self.create_named(name)
    }

    pub fn get_status(&self, id: i64) -> Result<Status> {
        self.get_named(id)
    }

    pub fn list_statuses(&self) -> Result<Vec<Status>> {
        self.list_named()
    }

    pub fn update_status(&mut self, id: i64, name: &str) -> Result<Status> {
        self.rename_named(id, name)
    }

    /// Delete a status; refused while any task carries it.
    pub fn delete_status(&mut self, id: i64) -> Result<()> {
        self.delete_named::<Status>(id)
    }

    pub fn status_name_taken(&self, name: &str, exclude: Option<i64>) -> Result<bool> {
        self.name_taken::<Status>(name, exclude)
    }

    // === Label Operations ===

    pub fn create_label(&mut self, name: &str) -> Result<Label> {
        self.create_named(name)
    }

    pub fn get_label(&self, id: i64) -> Result<Label> {
        self.get_named(id)
    }

    pub fn list_labels(&self) -> Result<Vec<Label>> {
        self.list_named()
    }

    pub fn update_label(&mut self, id: i64, name: &str) -> Result<Label> {
        self.rename_named(id, name)
    }

    /// Delete a label; refused while any task carries it.
    pub fn delete_label(&mut self, id: i64) -> Result<()> {
        self.delete_named::<Label>(id)
    }

    pub fn label_name_taken(&self, name: &str, exclude: Option<i64>) -> Result<bool> {
        self.name_taken::<Label>(name, exclude)
    }

    fn create_named<T: Catalog>(&mut self, name: &str) -> Result<T> {
        let now = Utc::now();
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (name, created_at) VALUES (?1, ?2)",
                    T::TABLE
                ),
                params![name, timestamp(&now)],
            )
            .map_err(|e| write_error(e, format!("{} name {}", T::KIND, name)))?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(kind = T::KIND, id, name, "catalog entry created");
        self.get_named(id)
    }

    fn get_named<T: Catalog>(&self, id: i64) -> Result<T> {
        self.conn
            .query_row(
                &format!("SELECT id, name, created_at FROM {} WHERE id = ?", T::TABLE),
                [id],
                catalog_from_row::<T>,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("{} not found: {}", T::KIND, id)))
    }

    fn list_named<T: Catalog>(&self) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, created_at FROM {} ORDER BY id",
            T::TABLE
        ))?;
        let rows = stmt
            .query_map([], catalog_from_row::<T>)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn rename_named<T: Catalog>(&mut self, id: i64, name: &str) -> Result<T> {
        let changed = self
            .conn
            .execute(
                &format!("UPDATE {} SET name = ?1 WHERE id = ?2", T::TABLE),
                params![name, id],
            )
            .map_err(|e| write_error(e, format!("{} name {}", T::KIND, name)))?;
        if changed == 0 {
            return Err(Error::NotFound(format!("{} not found: {}", T::KIND, id)));
        }
        tracing::info!(kind = T::KIND, id, name, "catalog entry renamed");
        self.get_named(id)
    }

    fn delete_named<T: Catalog>(&mut self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?", T::TABLE), [id])
            .map_err(|e| delete_error(e, format!("{} {}", T::KIND, id)))?;
        if changed == 0 {
            return Err(Error::NotFound(format!("{} not found: {}", T::KIND, id)));
        }
        tracing::info!(kind = T::KIND, id, "catalog entry deleted");
        Ok(())
    }

    fn name_taken<T: Catalog>(&self, name: &str, exclude: Option<i64>) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE name = ?1 AND id != ?2",
                T::TABLE
            ),
            params![name, exclude.unwrap_or(-1)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // === Task Operations ===

    /// Create a task authored by `author_id`.
    ///
    /// The author is a separate argument so it can only come from the
    /// caller's identity, never from submitted task data.
    pub fn create_task(&mut self, input: &TaskInput, author_id: i64) -> Result<Task> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks (name, description, status_id, executor_id, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                input.name,
                input.description,
                input.status_id,
                input.executor_id,
                author_id,
                timestamp(&now),
            ],
        )
        .map_err(|e| write_error(e, format!("task name {}", input.name)))?;
        let id = tx.last_insert_rowid();
        insert_task_labels(&tx, id, &input.label_ids)?;
        tx.commit()?;

        tracing::info!(task_id = id, author_id, "task created");
        self.get_task(id)
    }

    /// Get a task by ID with its status, people and labels.
    pub fn get_task(&self, id: i64) -> Result<Task> {
        let mut task = self
            .conn
            .query_row(&format!("{} WHERE t.id = ?", TASK_SELECT), [id], task_from_row)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Task not found: {}", id)))?;
        task.labels = self.task_labels(id)?;
        Ok(task)
    }

    /// List the tasks matching every predicate of `filter`.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let (clause, values) = filter.where_clause();
        let sql = format!("{}{} ORDER BY t.id", TASK_SELECT, clause);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut tasks = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for task in &mut tasks {
            task.labels = self.task_labels(task.id)?;
        }
        Ok(tasks)
    }

    /// Replace a task's editable fields and label set.
    ///
    /// The author is not editable and is left as created.
    pub fn update_task(&mut self, id: i64, input: &TaskInput) -> Result<Task> {
        let tx = self.conn.transaction()?;
        let changed = tx
            .execute(
                "UPDATE tasks SET name = ?1, description = ?2, status_id = ?3, executor_id = ?4
                 WHERE id = ?5",
                params![
                    input.name,
                    input.description,
                    input.status_id,
                    input.executor_id,
                    id
                ],
            )
            .map_err(|e| write_error(e, format!("task name {}", input.name)))?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Task not found: {}", id)));
        }
        tx.execute("DELETE FROM task_labels WHERE task_id = ?", [id])?;
        insert_task_labels(&tx, id, &input.label_ids)?;
        tx.commit()?;

        tracing::info!(task_id = id, "task updated");
        self.get_task(id)
    }

    /// Delete a task together with its label links.
    pub fn delete_task(&mut self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?", [id])
            .map_err(|e| delete_error(e, format!("task {}", id)))?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Task not found: {}", id)));
        }
        tracing::info!(task_id = id, "task deleted");
        Ok(())
    }

    pub fn task_name_taken(&self, name: &str, exclude: Option<i64>) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE name = ?1 AND id != ?2",
            params![name, exclude.unwrap_or(-1)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Number of label links stored for a task.
    pub fn count_task_labels(&self, task_id: i64) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM task_labels WHERE task_id = ?",
            [task_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn task_labels(&self, task_id: i64) -> Result<Vec<Label>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.name, l.created_at FROM labels l
             JOIN task_labels tl ON tl.label_id = l.id
             WHERE tl.task_id = ?
             ORDER BY l.id",
        )?;
        let labels = stmt
            .query_map([task_id], catalog_from_row::<Label>)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(labels)
    }

    // === Session Operations ===

    /// Start a session and return the browser token.
    ///
    /// Expired sessions are purged on the way.
    pub fn create_session(&mut self, user_id: Option<i64>, ttl: Duration) -> Result<String> {
        self.purge_expired_sessions()?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::Config(format!("session lifetime out of range: {}", ttl)))?;

        let token = auth::generate_session_token();
        self.conn.execute(
            "INSERT INTO sessions (digest, user_id, created_at, expires_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                auth::session_digest(&token),
                user_id,
                timestamp(&now),
                timestamp(&expires_at),
            ],
        )?;
        Ok(token)
    }

    /// Resolve a browser token to a live session.
    ///
    /// Unknown and expired tokens resolve to `None`.
    pub fn load_session(&self, token: &str) -> Result<Option<SessionRecord>> {
        let digest = auth::session_digest(token);
        let row = self
            .conn
            .query_row(
                "SELECT user_id, expires_at FROM sessions WHERE digest = ?",
                [&digest],
                |row| {
                    Ok((
                        row.get::<_, Option<i64>>(0)?,
                        parse_timestamp(row, 1)?,
                    ))
                },
            )
            .optional()?;

        let Some((user_id, expires_at)) = row else {
            return Ok(None);
        };
        if expires_at <= Utc::now() {
            return Ok(None);
        }

        let user = match user_id {
            Some(id) => Some(self.get_user(id)?),
            None => None,
        };
        Ok(Some(SessionRecord { user }))
    }

    /// Replace a session with a fresh token bound to `user_id`.
    ///
    /// Pending notices move to the new session; the old token stops
    /// working.
    pub fn rotate_session(
        &mut self,
        old_token: Option<&str>,
        user_id: Option<i64>,
        ttl: Duration,
    ) -> Result<String> {
        let token = self.create_session(user_id, ttl)?;
        if let Some(old) = old_token {
            let old_digest = auth::session_digest(old);
            let tx = self.conn.transaction()?;
            tx.execute(
                "UPDATE messages SET session_digest = ?1 WHERE session_digest = ?2",
                params![auth::session_digest(&token), old_digest],
            )?;
            tx.execute("DELETE FROM sessions WHERE digest = ?", [&old_digest])?;
            tx.commit()?;
        }
        Ok(token)
    }

    fn purge_expired_sessions(&mut self) -> Result<usize> {
        let purged = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?",
            [timestamp(&Utc::now())],
        )?;
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }
        Ok(purged)
    }

    // === Notice Operations ===

    /// Queue a notice for the session behind `token`.
    pub fn push_notice(&mut self, token: &str, notice: Notice) -> Result<()> {
        self.conn.execute(
            "INSERT INTO messages (session_digest, notice, created_at) VALUES (?1, ?2, ?3)",
            params![
                auth::session_digest(token),
                notice.key(),
                timestamp(&Utc::now())
            ],
        )?;
        Ok(())
    }

    /// Remove and return the notices queued for a session, oldest first.
    pub fn take_notices(&mut self, token: &str) -> Result<Vec<Notice>> {
        let digest = auth::session_digest(token);
        let tx = self.conn.transaction()?;
        let keys = {
            let mut stmt =
                tx.prepare("SELECT notice FROM messages WHERE session_digest = ? ORDER BY id")?;
            stmt.query_map([&digest], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.execute("DELETE FROM messages WHERE session_digest = ?", [&digest])?;
        tx.commit()?;

        Ok(keys.iter().filter_map(|k| Notice::from_key(k)).collect())
    }
}

/// Tables holding a plain catalog of unique names.
trait Catalog: Sized {
    const TABLE: &'static str;
    const KIND: &'static str;

    fn from_parts(id: i64, name: String, created_at: DateTime<Utc>) -> Self;
}

impl Catalog for Status {
    const TABLE: &'static str = "statuses";
    const KIND: &'static str = "Status";

    fn from_parts(id: i64, name: String, created_at: DateTime<Utc>) -> Self {
        Status {
            id,
            name,
            created_at,
        }
    }
}

impl Catalog for Label {
    const TABLE: &'static str = "labels";
    const KIND: &'static str = "Label";

    fn from_parts(id: i64, name: String, created_at: DateTime<Utc>) -> Self {
        Label {
            id,
            name,
            created_at,
        }
    }
}

fn catalog_from_row<T: Catalog>(row: &Row<'_>) -> rusqlite::Result<T> {
    Ok(T::from_parts(row.get(0)?, row.get(1)?, parse_timestamp(row, 2)?))
}

fn user_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(offset)?,
        username: row.get(offset + 1)?,
        first_name: row.get(offset + 2)?,
        last_name: row.get(offset + 3)?,
        created_at: parse_timestamp(row, offset + 4)?,
    })
}

/// Map a row of [`TASK_SELECT`]; labels are loaded separately.
fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let executor = match row.get::<_, Option<i64>>(12)? {
        Some(_) => Some(user_from_row(row, 12)?),
        None => None,
    };

    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_timestamp(row, 3)?,
        status: Status {
            id: row.get(4)?,
            name: row.get(5)?,
            created_at: parse_timestamp(row, 6)?,
        },
        created_by: user_from_row(row, 7)?,
        executor,
        labels: Vec::new(),
    })
}

fn insert_task_labels(conn: &Connection, task_id: i64, label_ids: &[i64]) -> Result<()> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO task_labels (task_id, label_id) VALUES (?1, ?2)")?;
    for label_id in label_ids {
        stmt.execute(params![task_id, label_id])?;
    }
    Ok(())
}

/// Fixed-width UTC timestamp, so stored values compare lexicographically.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Extended SQLite result code of a constraint violation, if `err` is one.
fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

/// Translate a failed delete: a foreign key hit means the row is protected.
fn delete_error(err: rusqlite::Error, what: String) -> Error {
    match constraint_code(&err) {
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Error::Protected(what),
        _ => Error::Database(err),
    }
}

/// Translate a failed insert/update: a unique hit means a duplicate value.
fn write_error(err: rusqlite::Error, what: String) -> Error {
    match constraint_code(&err) {
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => Error::Duplicate(what),
        _ => Error::Database(err),
    }
}
