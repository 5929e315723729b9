//! The user directory backed by the `users` table.

use super::Database;
use crate::dispatch::recipients::UserDirectory;
use crate::error::DirectoryError;
use async_trait::async_trait;
use common::model::recipient::User;
use rusqlite::{params_from_iter, Connection, Row};

fn read_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
    })
}

/// `?1, ?2, ...` for `n` bound values.
fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Users holding any of `roles` that have an email address, in id order.
pub fn by_roles(conn: &Connection, roles: &[String]) -> rusqlite::Result<Vec<User>> {
    if roles.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, name, email, role FROM users
         WHERE role IN ({}) AND email IS NOT NULL AND email != '' ORDER BY id",
        placeholders(roles.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(roles.iter()), read_user)?;
    rows.collect()
}

/// Users with the given ids that have an email address, in id order.
pub fn by_ids(conn: &Connection, ids: &[i64]) -> rusqlite::Result<Vec<User>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, name, email, role FROM users
         WHERE id IN ({}) AND email IS NOT NULL AND email != '' ORDER BY id",
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), read_user)?;
    rows.collect()
}

/// [`UserDirectory`] reading the SQLite `users` table on the blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteUserDirectory {
    database: Database,
}

impl SqliteUserDirectory {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    async fn query<T, F>(&self, f: F) -> Result<T, DirectoryError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let database = self.database.clone();
        let result = tokio::task::spawn_blocking(move || {
            let conn = database.open()?;
            f(&conn)
        })
        .await
        .map_err(|e| DirectoryError::Task(e.to_string()))?;
        Ok(result?)
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn users_by_roles(&self, roles: &[String]) -> Result<Vec<User>, DirectoryError> {
        let roles = roles.to_vec();
        self.query(move |conn| by_roles(conn, &roles)).await
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, DirectoryError> {
        let ids = ids.to_vec();
        self.query(move |conn| by_ids(conn, &ids)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_db;
    use rusqlite::params;

    fn seed(conn: &Connection) {
        for (name, email, role) in [
            ("Ada", Some("ada@example.com"), "admin"),
            ("Grace", Some("grace@example.com"), "manager"),
            ("Ghost", None, "admin"),
            ("Linus", Some("linus@example.com"), "staff"),
        ] {
            conn.execute(
                "INSERT INTO users (name, email, role) VALUES (?1, ?2, ?3)",
                params![name, email, role],
            )
            .unwrap();
        }
    }

    #[test]
    fn selects_by_role_skipping_users_without_email() {
        let conn = memory_db();
        seed(&conn);
        let users = by_roles(&conn, &["admin".to_string(), "staff".to_string()]).unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Linus"]);
        assert!(by_roles(&conn, &[]).unwrap().is_empty());
    }

    #[test]
    fn selects_by_id() {
        let conn = memory_db();
        seed(&conn);
        let users = by_ids(&conn, &[2, 3, 99]).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "grace@example.com");
    }

    #[tokio::test]
    async fn directory_reads_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::new(dir.path().join("users.sqlite"));
        database.initialize().unwrap();
        seed(&database.open().unwrap());

        let directory = SqliteUserDirectory::new(database);
        let users = directory
            .users_by_roles(&["manager".to_string()])
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Grace");
    }
}
