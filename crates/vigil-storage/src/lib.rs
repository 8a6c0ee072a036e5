//! Vigil Storage - SQLite persistence layer.
//!
//! This crate provides database storage for the Vigil safety engine.
//! It handles:
//!
//! - The banned keyword list the registry loads from (soft-deleted
//!   via `is_active`)
//! - Safety audit rows, one per check call (content is truncated to a
//!   snippet, never stored in full)
//! - Per-user trust scores (start at 100, floored at 0)
//!
//! # Example
//!
//! ```no_run
//! use vigil_storage::{Database, NewBannedKeyword};
//! use vigil_core::{KeywordScope, Severity};
//!
//! let db = Database::in_memory().unwrap();
//!
//! db.add_banned_keyword(NewBannedKeyword {
//!     keyword: "free crypto".to_string(),
//!     category: "spam".to_string(),
//!     severity: Severity::Medium,
//!     scope: KeywordScope::Any,
//! }).unwrap();
//!
//! let keywords = db.load_active_keywords().unwrap();
//! assert_eq!(keywords.len(), 1);
//! ```

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;

pub use database::Database;
pub use error::{Result, StorageError};
pub use models::{AuditRecord, BannedKeyword, NewAuditRecord, NewBannedKeyword, UserTrustScore};
pub use pool::ConnectionPool;
pub use repository::{create_snippet, AuditsRepo, KeywordsRepo, TrustRepo};
