//! SQLite persistence for templates and the user directory.
//!
//! Every operation opens its own connection on the database file, the same way the
//! request handlers always have. Query functions take a `&Connection` so they run
//! unchanged against an in-memory database in tests.

pub mod dashboard;
pub mod templates;
pub mod users;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS email_template_drafts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    template_name TEXT NOT NULL UNIQUE,
    created_by TEXT NOT NULL DEFAULT '',
    subject TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT '[]',
    email_body TEXT,
    email_css TEXT,
    recipients TEXT NOT NULL DEFAULT '[]',
    status TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    role TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
";

/// Location of the SQLite database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.path)
    }

    /// Creates missing tables.
    pub fn initialize(&self) -> rusqlite::Result<()> {
        initialize(&self.open()?)
    }
}

pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

#[cfg(test)]
pub(crate) fn memory_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
