//! Data models for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::{ContentType, KeywordEntry, KeywordScope, Severity};

/// A banned keyword row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedKeyword {
    /// Unique identifier.
    pub id: i64,
    /// The match key (stored lower-cased).
    pub keyword: String,
    /// Violation taxonomy label.
    pub category: String,
    /// Severity of a hit on this keyword.
    pub severity: Severity,
    /// Which content types this keyword applies to.
    pub scope: KeywordScope,
    /// Soft-delete flag; the registry only loads active rows.
    pub is_active: bool,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

impl BannedKeyword {
    /// Converts the row into a registry entry.
    pub fn into_entry(self) -> KeywordEntry {
        KeywordEntry::new(self.keyword, self.category, self.severity, self.scope)
    }
}

/// Input for inserting a banned keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBannedKeyword {
    /// The match key; lower-cased before storage.
    pub keyword: String,
    /// Violation taxonomy label.
    pub category: String,
    /// Severity of a hit on this keyword.
    pub severity: Severity,
    /// Which content types this keyword applies to.
    pub scope: KeywordScope,
}

/// A persisted safety audit row (one per check call).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier.
    pub id: i64,
    /// Opaque reference to the checked content, if any.
    pub content_id: Option<String>,
    /// The kind of content that was checked.
    pub content_type: ContentType,
    /// Truncated snippet of the checked text.
    pub content_snippet: String,
    /// The computed score, 0 to 100.
    pub safety_score: u8,
    /// Violation category labels.
    pub violations: Vec<String>,
    /// Whether the check approved the content.
    pub is_approved: bool,
    /// Whether the check flagged the content for review.
    pub is_flagged: bool,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a safety audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditRecord {
    /// Opaque reference to the checked content, if any.
    pub content_id: Option<String>,
    /// The kind of content that was checked.
    pub content_type: ContentType,
    /// The checked text; truncated to a snippet at insert time.
    pub content_text: String,
    /// The computed score, 0 to 100.
    pub safety_score: u8,
    /// Violation category labels.
    pub violations: Vec<String>,
    /// Whether the check approved the content.
    pub is_approved: bool,
    /// Whether the check flagged the content for review.
    pub is_flagged: bool,
}

/// A per-user trust score aggregate.
///
/// Starts at 100 for users never penalized; floored at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTrustScore {
    /// The user this score belongs to.
    pub user_id: String,
    /// Current trust score, 0 to 100.
    pub trust_score: i64,
    /// Number of violating checks applied against this user.
    pub violations_count: i64,
    /// Timestamp of the most recent penalty.
    pub last_violation_at: Option<DateTime<Utc>>,
}
