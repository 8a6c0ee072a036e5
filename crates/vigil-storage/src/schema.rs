//! Database schema and migrations.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            "Running migrations from version {} to {}",
            current_version, SCHEMA_VERSION
        );

        if current_version < 1 {
            migrate_v1(conn)?;
        }

        if current_version < 2 {
            migrate_v2(conn)?;
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!("Migrations complete");
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: Initial schema.
fn migrate_v1(conn: &Connection) -> Result<()> {
    info!("Applying migration v1: Initial schema");

    // Banned keywords table - the persisted keyword list the registry
    // loads from. Rows are soft-deleted via is_active.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS banned_keywords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            keyword TEXT NOT NULL,
            category TEXT NOT NULL,
            severity TEXT NOT NULL,
            context TEXT NOT NULL DEFAULT 'any',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Safety audits table - one row per check call. Repeated checks on
    // the same content id append additional rows.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS safety_audits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_id TEXT,
            content_type TEXT NOT NULL,
            content_snippet TEXT NOT NULL,
            safety_score INTEGER NOT NULL,
            violations TEXT NOT NULL DEFAULT '[]',
            is_approved INTEGER NOT NULL,
            is_flagged INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // User trust scores - mutated only by the trust adjuster.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_trust_scores (
            user_id TEXT PRIMARY KEY,
            trust_score INTEGER NOT NULL DEFAULT 100,
            violations_count INTEGER NOT NULL DEFAULT 0,
            last_violation_at TEXT
        )",
        [],
    )?;

    Ok(())
}

/// Migration to version 2: Query indexes.
fn migrate_v2(conn: &Connection) -> Result<()> {
    info!("Applying migration v2: Indexes");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_safety_audits_created_at
         ON safety_audits (created_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_safety_audits_content_id
         ON safety_audits (content_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_banned_keywords_active
         ON banned_keywords (is_active)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn tables_exist_after_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["banned_keywords", "safety_audits", "user_trust_scores"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }
}
