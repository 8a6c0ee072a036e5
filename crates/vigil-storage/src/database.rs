//! High-level database interface.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use tracing::info;

use crate::error::{Result, StorageError};
use crate::models::{AuditRecord, BannedKeyword, NewAuditRecord, NewBannedKeyword, UserTrustScore};
use crate::pool::ConnectionPool;
use crate::repository::{AuditsRepo, KeywordsRepo, TrustRepo};

/// High-level database interface for Vigil.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        let path = Self::default_db_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "vigil", "vigil")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("vigil.db"))
    }

    // === Banned keywords ===

    /// Add a banned keyword.
    pub fn add_banned_keyword(&self, keyword: NewBannedKeyword) -> Result<i64> {
        let conn = self.pool.get()?;
        KeywordsRepo::insert(&conn, keyword)
    }

    /// Load all active banned keywords.
    pub fn load_active_keywords(&self) -> Result<Vec<BannedKeyword>> {
        let conn = self.pool.get()?;
        KeywordsRepo::load_active(&conn)
    }

    /// Deactivate a banned keyword.
    pub fn deactivate_keyword(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        KeywordsRepo::deactivate(&conn, id)
    }

    /// Count active banned keywords.
    pub fn active_keyword_count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        KeywordsRepo::count_active(&conn)
    }

    // === Safety audits ===

    /// Record a safety audit row.
    pub fn record_audit(&self, record: NewAuditRecord) -> Result<i64> {
        let conn = self.pool.get()?;
        AuditsRepo::insert(&conn, record)
    }

    /// Get an audit row by ID.
    pub fn audit_by_id(&self, id: i64) -> Result<Option<AuditRecord>> {
        let conn = self.pool.get()?;
        AuditsRepo::get_by_id(&conn, id)
    }

    /// List every audit row.
    pub fn all_audits(&self) -> Result<Vec<AuditRecord>> {
        let conn = self.pool.get()?;
        AuditsRepo::list_all(&conn)
    }

    /// List audit rows for a specific content item.
    pub fn audits_for_content(&self, content_id: &str) -> Result<Vec<AuditRecord>> {
        let conn = self.pool.get()?;
        AuditsRepo::list_for_content(&conn, content_id)
    }

    /// Count all audit rows.
    pub fn audit_count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        AuditsRepo::count(&conn)
    }

    /// Delete audit rows older than a given date.
    pub fn delete_audits_older_than(&self, before: DateTime<Utc>) -> Result<i64> {
        let conn = self.pool.get()?;
        AuditsRepo::delete_older_than(&conn, before)
    }

    // === Trust scores ===

    /// Get a user's trust score, defaulting to full trust.
    pub fn trust_score(&self, user_id: &str) -> Result<UserTrustScore> {
        let conn = self.pool.get()?;
        TrustRepo::get_or_default(&conn, user_id)
    }

    /// Apply a penalty to a user's trust score.
    pub fn apply_trust_penalty(&self, user_id: &str, penalty: u32) -> Result<UserTrustScore> {
        let conn = self.pool.get()?;
        TrustRepo::apply_penalty(&conn, user_id, penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{ContentType, KeywordScope, Severity};

    fn db() -> Database {
        Database::in_memory().unwrap()
    }

    #[test]
    fn test_keyword_lifecycle() {
        let db = db();

        let id = db
            .add_banned_keyword(NewBannedKeyword {
                keyword: "badword".to_string(),
                category: "violence".to_string(),
                severity: Severity::Medium,
                scope: KeywordScope::Any,
            })
            .unwrap();

        assert_eq!(db.active_keyword_count().unwrap(), 1);
        assert!(db.deactivate_keyword(id).unwrap());
        assert_eq!(db.active_keyword_count().unwrap(), 0);
        assert!(db.load_active_keywords().unwrap().is_empty());
    }

    #[test]
    fn test_audit_round_trip() {
        let db = db();

        let id = db
            .record_audit(NewAuditRecord {
                content_id: Some("post-1".to_string()),
                content_type: ContentType::Post,
                content_text: "flagged text".to_string(),
                safety_score: 70,
                violations: vec!["spam".to_string()],
                is_approved: false,
                is_flagged: true,
            })
            .unwrap();

        let record = db.audit_by_id(id).unwrap().unwrap();
        assert_eq!(record.safety_score, 70);
        assert_eq!(db.audit_count().unwrap(), 1);
        assert_eq!(db.audits_for_content("post-1").unwrap().len(), 1);
    }

    #[test]
    fn test_trust_penalty_through_facade() {
        let db = db();

        let score = db.apply_trust_penalty("u-1", 43).unwrap();
        assert_eq!(score.trust_score, 57);
        assert_eq!(db.trust_score("u-1").unwrap().trust_score, 57);
        assert_eq!(db.trust_score("u-2").unwrap().trust_score, 100);
    }

    #[test]
    fn test_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.db");

        let db = Database::with_path(&path).unwrap();
        db.apply_trust_penalty("u-1", 10).unwrap();
        drop(db);

        let reopened = Database::with_path(&path).unwrap();
        assert_eq!(reopened.trust_score("u-1").unwrap().trust_score, 90);
    }
}
