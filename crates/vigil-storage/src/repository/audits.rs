//! Safety audit repository.
//!
//! One row per check call; repeated checks on the same content id
//! append additional rows rather than updating in place.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use vigil_core::ContentType;

use super::{column_parse_error, parse_datetime, parse_json_array};
use crate::error::Result;
use crate::models::{AuditRecord, NewAuditRecord};

/// Maximum content snippet length in characters.
const SNIPPET_MAX_LEN: usize = 200;

/// Repository for safety audit operations.
pub struct AuditsRepo;

impl AuditsRepo {
    /// Insert a new audit row. The content text is truncated to a
    /// snippet; violations are stored as a JSON array.
    pub fn insert(conn: &Connection, record: NewAuditRecord) -> Result<i64> {
        let violations_json =
            serde_json::to_string(&record.violations).unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "INSERT INTO safety_audits
                 (content_id, content_type, content_snippet, safety_score,
                  violations, is_approved, is_flagged)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.content_id,
                record.content_type.as_str(),
                create_snippet(&record.content_text),
                record.safety_score,
                violations_json,
                record.is_approved,
                record.is_flagged,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get an audit row by ID.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<AuditRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, content_id, content_type, content_snippet, safety_score,
                    violations, is_approved, is_flagged, created_at
             FROM safety_audits WHERE id = ?1",
        )?;

        let record = stmt.query_row([id], map_row).ok();

        Ok(record)
    }

    /// List every audit row, oldest first. The statistics aggregation
    /// scans this in full.
    pub fn list_all(conn: &Connection) -> Result<Vec<AuditRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, content_id, content_type, content_snippet, safety_score,
                    violations, is_approved, is_flagged, created_at
             FROM safety_audits ORDER BY id ASC",
        )?;

        let records = stmt
            .query_map([], map_row)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(records)
    }

    /// List audit rows for a specific content item, newest first.
    pub fn list_for_content(conn: &Connection, content_id: &str) -> Result<Vec<AuditRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, content_id, content_type, content_snippet, safety_score,
                    violations, is_approved, is_flagged, created_at
             FROM safety_audits WHERE content_id = ?1 ORDER BY id DESC",
        )?;

        let records = stmt
            .query_map([content_id], map_row)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(records)
    }

    /// Count all audit rows.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM safety_audits", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete audit rows older than a given date. Returns the number
    /// of rows removed.
    pub fn delete_older_than(conn: &Connection, before: DateTime<Utc>) -> Result<i64> {
        let deleted = conn.execute(
            "DELETE FROM safety_audits WHERE created_at < ?1",
            [before.to_rfc3339()],
        )?;
        Ok(deleted as i64)
    }
}

/// Create a content snippet from text (truncated and cleaned).
pub fn create_snippet(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control())
        .take(SNIPPET_MAX_LEN)
        .collect();

    if text.chars().count() > SNIPPET_MAX_LEN {
        format!("{}...", cleaned)
    } else {
        cleaned
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<AuditRecord> {
    let content_type_str: String = row.get(2)?;
    let content_type =
        ContentType::parse(&content_type_str).ok_or_else(|| column_parse_error(2, "content type"))?;

    Ok(AuditRecord {
        id: row.get(0)?,
        content_id: row.get(1)?,
        content_type,
        content_snippet: row.get(3)?,
        safety_score: row.get::<_, i64>(4)?.clamp(0, 100) as u8,
        violations: parse_json_array(&row.get::<_, String>(5)?),
        is_approved: row.get::<_, i32>(6)? != 0,
        is_flagged: row.get::<_, i32>(7)? != 0,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}
