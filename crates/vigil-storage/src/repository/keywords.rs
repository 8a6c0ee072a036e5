//! Banned keywords repository.

use rusqlite::{params, Connection, Row};
use vigil_core::{KeywordScope, Severity};

use super::{column_parse_error, parse_datetime};
use crate::error::Result;
use crate::models::{BannedKeyword, NewBannedKeyword};

/// Repository for banned keyword operations.
pub struct KeywordsRepo;

impl KeywordsRepo {
    /// Insert a new banned keyword. The keyword is lower-cased before
    /// storage, matching registry lookup semantics.
    pub fn insert(conn: &Connection, keyword: NewBannedKeyword) -> Result<i64> {
        conn.execute(
            "INSERT INTO banned_keywords (keyword, category, severity, context)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                keyword.keyword.to_lowercase(),
                keyword.category,
                keyword.severity.as_str(),
                keyword.scope.to_db_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a banned keyword by ID.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<BannedKeyword>> {
        let mut stmt = conn.prepare(
            "SELECT id, keyword, category, severity, context, is_active, created_at
             FROM banned_keywords WHERE id = ?1",
        )?;

        let keyword = stmt.query_row([id], map_row).ok();

        Ok(keyword)
    }

    /// Load all active keywords, for building the registry.
    pub fn load_active(conn: &Connection) -> Result<Vec<BannedKeyword>> {
        let mut stmt = conn.prepare(
            "SELECT id, keyword, category, severity, context, is_active, created_at
             FROM banned_keywords WHERE is_active = 1",
        )?;

        let keywords = stmt
            .query_map([], map_row)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(keywords)
    }

    /// Soft-delete a keyword. Takes effect at the next registry refresh.
    pub fn deactivate(conn: &Connection, id: i64) -> Result<bool> {
        let updated = conn.execute(
            "UPDATE banned_keywords SET is_active = 0 WHERE id = ?1",
            [id],
        )?;
        Ok(updated > 0)
    }

    /// Count active keywords.
    pub fn count_active(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM banned_keywords WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<BannedKeyword> {
    let severity_str: String = row.get(3)?;
    let severity =
        Severity::parse(&severity_str).ok_or_else(|| column_parse_error(3, "severity"))?;

    let context_str: String = row.get(4)?;
    let scope =
        KeywordScope::parse(&context_str).ok_or_else(|| column_parse_error(4, "keyword context"))?;

    Ok(BannedKeyword {
        id: row.get(0)?,
        keyword: row.get(1)?,
        category: row.get(2)?,
        severity,
        scope,
        is_active: row.get::<_, i32>(5)? != 0,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}
