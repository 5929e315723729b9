//! Aggregate counts over users and templates.

use crate::error::StoreError;
use common::model::dashboard::{DashboardStats, TemplateStatusCounts};
use rusqlite::Connection;

pub fn stats(conn: &Connection) -> Result<DashboardStats, StoreError> {
    let mut stats = DashboardStats::default();

    let mut stmt = conn.prepare("SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
    for row in rows {
        let (role, count) = row?;
        stats.total_users += count as u64;
        stats.users_by_role.insert(role, count as u64);
    }

    let (draft, published): (i64, i64) = conn.query_row(
        "SELECT
             COALESCE(SUM(CASE WHEN status = 'published' THEN 0 ELSE 1 END), 0),
             COALESCE(SUM(CASE WHEN status = 'published' THEN 1 ELSE 0 END), 0)
         FROM email_template_drafts",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    stats.templates_by_status = TemplateStatusCounts {
        draft: draft as u64,
        published: published as u64,
    };
    stats.total_templates = stats.templates_by_status.draft + stats.templates_by_status.published;

    Ok(stats)
}
