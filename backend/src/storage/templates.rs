//! Queries on the `email_template_drafts` table.

use crate::error::StoreError;
use common::model::recipient::RecipientSelector;
use common::model::template::{EmailTemplate, TemplateStatus};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde::Serialize;

const COLUMNS: &str = "id, template_name, created_by, subject, body, email_body, email_css, \
                       recipients, status, created_at, updated_at";

/// Listing entry; omits the heavy body columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub id: i64,
    pub template_name: String,
    pub created_by: String,
    pub subject: String,
    pub status: TemplateStatus,
    pub updated_at: String,
}

/// Raw row; `recipients` is still JSON text.
struct TemplateRow {
    template: EmailTemplate,
    recipients: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<TemplateRow> {
    let status: String = row.get(8)?;
    Ok(TemplateRow {
        template: EmailTemplate {
            id: Some(row.get(0)?),
            template_name: row.get(1)?,
            created_by: row.get(2)?,
            subject: row.get(3)?,
            body: row.get(4)?,
            email_body: row.get(5)?,
            email_css: row.get(6)?,
            recipients: Vec::new(),
            status: TemplateStatus::from_db(&status),
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        },
        recipients: row.get(7)?,
    })
}

pub fn get(conn: &Connection, id: i64) -> Result<EmailTemplate, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM email_template_drafts WHERE id = ?1", COLUMNS),
            params![id],
            read_row,
        )
        .optional()?
        .ok_or(StoreError::TemplateNotFound(id))?;

    let mut template = row.template;
    template.recipients = serde_json::from_str::<Vec<RecipientSelector>>(&row.recipients)?;
    Ok(template)
}

/// All templates, most recently updated first.
pub fn list(conn: &Connection) -> Result<Vec<TemplateSummary>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, template_name, created_by, subject, status, updated_at
         FROM email_template_drafts ORDER BY updated_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        let status: String = row.get(4)?;
        Ok(TemplateSummary {
            id: row.get(0)?,
            template_name: row.get(1)?,
            created_by: row.get(2)?,
            subject: row.get(3)?,
            status: TemplateStatus::from_db(&status),
            updated_at: row.get(5)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Inserts a new template and returns its id.
pub fn insert(conn: &Connection, template: &EmailTemplate) -> Result<i64, StoreError> {
    let recipients = serde_json::to_string(&template.recipients)?;
    conn.execute(
        "INSERT INTO email_template_drafts
            (template_name, created_by, subject, body, email_body, email_css, recipients, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            template.template_name,
            template.created_by,
            template.subject,
            template.body,
            template.email_body,
            template.email_css,
            recipients,
            template.status.as_str(),
        ],
    )
    .map_err(|e| duplicate_name(e, &template.template_name))?;
    Ok(conn.last_insert_rowid())
}

/// Replaces every editable column of template `id`.
pub fn update(conn: &Connection, id: i64, template: &EmailTemplate) -> Result<(), StoreError> {
    let recipients = serde_json::to_string(&template.recipients)?;
    let changed = conn
        .execute(
            "UPDATE email_template_drafts
             SET template_name = ?1, created_by = ?2, subject = ?3, body = ?4, email_body = ?5,
                 email_css = ?6, recipients = ?7, status = ?8, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?9",
            params![
                template.template_name,
                template.created_by,
                template.subject,
                template.body,
                template.email_body,
                template.email_css,
                recipients,
                template.status.as_str(),
                id,
            ],
        )
        .map_err(|e| duplicate_name(e, &template.template_name))?;
    if changed == 0 {
        return Err(StoreError::TemplateNotFound(id));
    }
    Ok(())
}

pub fn set_status(conn: &Connection, id: i64, status: TemplateStatus) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE email_template_drafts SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Err(StoreError::TemplateNotFound(id));
    }
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let changed = conn.execute(
        "DELETE FROM email_template_drafts WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        return Err(StoreError::TemplateNotFound(id));
    }
    Ok(())
}

fn duplicate_name(error: rusqlite::Error, name: &str) -> StoreError {
    match &error {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::DuplicateName(name.to_string())
        }
        _ => StoreError::Database(error),
    }
}
