//! Vigil Core - content safety scoring logic.
//!
//! This crate holds the pure pieces of the safety engine: the banned
//! keyword registry (copy-on-refresh snapshots), the scorer (keyword
//! matching plus structural spam heuristics), the action policy, and
//! the trust penalty computation. Nothing in this crate performs I/O;
//! persistence lives in `vigil-storage` and the wired-up engine in
//! `vigil-engine`.
//!
//! # Example
//!
//! ```
//! use vigil_core::{decide, reason, ContentType, KeywordEntry, KeywordRegistry,
//!     KeywordScope, SafetyAction, Scorer, Severity};
//!
//! let registry = KeywordRegistry::from_entries(vec![KeywordEntry::new(
//!     "free crypto",
//!     "spam",
//!     Severity::Medium,
//!     KeywordScope::Any,
//! )]);
//!
//! let scorer = Scorer::new();
//! let outcome = scorer.score("FREE CRYPTO inside!", ContentType::Comment, &registry);
//! let action = decide(outcome.score, &outcome.violations, ContentType::Comment);
//! let reason = reason(&outcome.violations, outcome.max_severity);
//!
//! assert_eq!(outcome.score, 50);
//! assert_eq!(action, SafetyAction::Flag);
//! assert_eq!(reason, "Content appears to be spam");
//! ```

pub mod policy;
pub mod registry;
pub mod scorer;
pub mod trust;
pub mod types;

pub use policy::{decide, reason};
pub use registry::{KeywordEntry, KeywordRegistry, SharedRegistry};
pub use scorer::{ScoreOutcome, Scorer};
pub use trust::violation_penalty;
pub use types::{category, ContentType, KeywordScope, SafetyAction, SafetyResult, Severity};
