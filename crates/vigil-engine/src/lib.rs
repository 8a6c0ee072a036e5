//! Vigil Engine - the wired-up content safety engine.
//!
//! Combines the pure scoring logic from `vigil-core` with the SQLite
//! persistence in `vigil-storage`: keyword registry lifecycle, audit
//! trail, trust-score penalties, and aggregate statistics.
//!
//! # Example
//!
//! ```
//! use vigil_engine::{Database, NewBannedKeyword, SafetyAction, SafetyEngine};
//! use vigil_engine::{KeywordScope, Severity};
//!
//! let db = Database::in_memory().unwrap();
//! db.add_banned_keyword(NewBannedKeyword {
//!     keyword: "contraband".to_string(),
//!     category: "weapons".to_string(),
//!     severity: Severity::Critical,
//!     scope: KeywordScope::Any,
//! }).unwrap();
//!
//! let engine = SafetyEngine::new(db);
//! let result = engine.check_comment_safety("selling contraband");
//!
//! assert_eq!(result.safety_score, 100);
//! assert_eq!(result.action, SafetyAction::Block);
//! ```

mod engine;
mod stats;

pub use engine::SafetyEngine;
pub use stats::{SafetyStatistics, ViolationCount};

// Re-export the boundary types callers need.
pub use vigil_core::{
    ContentType, KeywordEntry, KeywordRegistry, KeywordScope, SafetyAction, SafetyResult, Severity,
    SharedRegistry,
};
pub use vigil_storage::{
    AuditRecord, BannedKeyword, Database, NewBannedKeyword, UserTrustScore,
};
