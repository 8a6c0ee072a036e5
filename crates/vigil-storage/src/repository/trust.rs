//! User trust score repository.
//!
//! Trust scores start at 100 and floor at 0. Rows are created lazily
//! on the first penalty; a user with no row is at full trust.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use super::parse_datetime;
use crate::error::{Result, StorageError};
use crate::models::UserTrustScore;

/// Starting trust score for a user with no violations.
const INITIAL_TRUST: i64 = 100;

/// Repository for user trust score operations.
pub struct TrustRepo;

impl TrustRepo {
    /// Get a user's trust score row, if one exists.
    pub fn get(conn: &Connection, user_id: &str) -> Result<Option<UserTrustScore>> {
        let mut stmt = conn.prepare(
            "SELECT user_id, trust_score, violations_count, last_violation_at
             FROM user_trust_scores WHERE user_id = ?1",
        )?;

        let score = stmt.query_row([user_id], map_row).ok();

        Ok(score)
    }

    /// Get a user's trust score, defaulting to full trust for users
    /// with no row.
    pub fn get_or_default(conn: &Connection, user_id: &str) -> Result<UserTrustScore> {
        Ok(Self::get(conn, user_id)?.unwrap_or(UserTrustScore {
            user_id: user_id.to_string(),
            trust_score: INITIAL_TRUST,
            violations_count: 0,
            last_violation_at: None,
        }))
    }

    /// Apply a penalty to a user's trust score, flooring at 0, and
    /// record the violation. Returns the updated row.
    pub fn apply_penalty(conn: &Connection, user_id: &str, penalty: u32) -> Result<UserTrustScore> {
        let now = Utc::now().to_rfc3339();
        let penalty = i64::from(penalty);

        conn.execute(
            "INSERT INTO user_trust_scores
                 (user_id, trust_score, violations_count, last_violation_at)
             VALUES (?1, MAX(0, ?2 - ?3), 1, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 trust_score = MAX(0, trust_score - ?3),
                 violations_count = violations_count + 1,
                 last_violation_at = ?4",
            params![user_id, INITIAL_TRUST, penalty, now],
        )?;

        Self::get(conn, user_id)?
            .ok_or_else(|| StorageError::NotFound(format!("trust score for {}", user_id)))
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<UserTrustScore> {
    Ok(UserTrustScore {
        user_id: row.get(0)?,
        trust_score: row.get(1)?,
        violations_count: row.get(2)?,
        last_violation_at: row.get::<_, Option<String>>(3)?.map(|s| parse_datetime(&s)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::run_migrations;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_unknown_user_defaults_to_full_trust() {
        let conn = setup_db();

        assert!(TrustRepo::get(&conn, "u-1").unwrap().is_none());

        let score = TrustRepo::get_or_default(&conn, "u-1").unwrap();
        assert_eq!(score.trust_score, 100);
        assert_eq!(score.violations_count, 0);
        assert!(score.last_violation_at.is_none());
    }

    #[test]
    fn test_first_penalty_creates_row() {
        let conn = setup_db();

        let score = TrustRepo::apply_penalty(&conn, "u-1", 43).unwrap();
        assert_eq!(score.trust_score, 57);
        assert_eq!(score.violations_count, 1);
        assert!(score.last_violation_at.is_some());
    }

    #[test]
    fn test_penalties_accumulate() {
        let conn = setup_db();

        TrustRepo::apply_penalty(&conn, "u-1", 30).unwrap();
        let score = TrustRepo::apply_penalty(&conn, "u-1", 25).unwrap();

        assert_eq!(score.trust_score, 45);
        assert_eq!(score.violations_count, 2);
    }

    #[test]
    fn test_trust_score_floors_at_zero() {
        let conn = setup_db();

        TrustRepo::apply_penalty(&conn, "u-1", 80).unwrap();
        let score = TrustRepo::apply_penalty(&conn, "u-1", 80).unwrap();

        assert_eq!(score.trust_score, 0);
        assert_eq!(score.violations_count, 2);
    }

    #[test]
    fn test_penalties_are_per_user() {
        let conn = setup_db();

        TrustRepo::apply_penalty(&conn, "u-1", 50).unwrap();

        let other = TrustRepo::get_or_default(&conn, "u-2").unwrap();
        assert_eq!(other.trust_score, 100);
    }
}
