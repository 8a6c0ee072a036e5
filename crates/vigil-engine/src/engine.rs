//! The safety engine: scoring wired to persistence.
//!
//! `SafetyEngine` is the library entry point callers use. Scoring
//! itself is pure and synchronous; the engine adds the registry
//! lifecycle (load, refresh), the audit write, and the trust-score
//! penalty, all of which are fire-and-forget from the caller's
//! perspective.
//!
//! ## Fail-open policy
//!
//! The engine favors availability over strictness: a keyword load
//! failure degrades scoring to heuristics-only, and a failed audit
//! write or trust update is logged and swallowed. Callers always get
//! the computed `SafetyResult` back; legitimate content is never
//! blocked by an internal outage. Whether high-risk deployments
//! should instead fail closed on registry load failure is a policy
//! decision; this implementation deliberately keeps fail-open for
//! every content type.

use tracing::{debug, info, warn};

use vigil_core::{
    decide, reason, violation_penalty, ContentType, KeywordRegistry, SafetyResult, Scorer,
    SharedRegistry,
};
use vigil_storage::{Database, NewAuditRecord};

use crate::stats::SafetyStatistics;

/// Content safety engine.
///
/// Cheap to clone-and-share via its interior handles; concurrent
/// checks are independent and take their own registry snapshot.
pub struct SafetyEngine {
    scorer: Scorer,
    registry: SharedRegistry,
    db: Database,
}

impl SafetyEngine {
    /// Creates an engine and performs the initial keyword load.
    ///
    /// A load failure leaves the registry empty (heuristics-only
    /// scoring) rather than failing construction.
    pub fn new(db: Database) -> Self {
        let engine = Self {
            scorer: Scorer::new(),
            registry: SharedRegistry::new(),
            db,
        };
        engine.refresh_banned_keywords();
        engine
    }

    /// Creates an engine around an externally managed registry handle.
    pub fn with_registry(db: Database, registry: SharedRegistry) -> Self {
        Self {
            scorer: Scorer::new(),
            registry,
            db,
        }
    }

    /// Checks a piece of content and returns the full safety result.
    ///
    /// This is the primary entry point. The result is computed
    /// synchronously against the current registry snapshot; the audit
    /// write happens afterwards and its failure never alters or
    /// withholds the result.
    pub fn check_content_safety(
        &self,
        text: &str,
        content_type: ContentType,
        content_id: Option<&str>,
    ) -> SafetyResult {
        let registry = self.registry.snapshot();
        let outcome = self.scorer.score(text, content_type, &registry);
        let action = decide(outcome.score, &outcome.violations, content_type);
        let reason = reason(&outcome.violations, outcome.max_severity);

        let result = SafetyResult::new(
            content_id.map(str::to_string),
            content_type,
            outcome.score,
            outcome.violations_vec(),
            action,
            reason,
        );

        self.write_audit(text, &result);

        result
    }

    // === Convenience wrappers ===

    /// Checks a post (title and body are scored together).
    pub fn check_post_safety(&self, title: &str, body: &str) -> SafetyResult {
        let text = format!("{} {}", title, body);
        self.check_content_safety(&text, ContentType::Post, None)
    }

    /// Checks a comment.
    pub fn check_comment_safety(&self, text: &str) -> SafetyResult {
        self.check_content_safety(text, ContentType::Comment, None)
    }

    /// Checks a profile biography.
    pub fn check_bio_safety(&self, text: &str) -> SafetyResult {
        self.check_content_safety(text, ContentType::ProfileBio, None)
    }

    /// Checks a direct message.
    pub fn check_message_safety(&self, text: &str) -> SafetyResult {
        self.check_content_safety(text, ContentType::Message, None)
    }

    /// Checks a community description.
    pub fn check_community_description_safety(&self, text: &str) -> SafetyResult {
        self.check_content_safety(text, ContentType::CommunityDescription, None)
    }

    // === Trust scores ===

    /// Applies a trust penalty to a user for a violating check.
    ///
    /// Invoked by callers explicitly after they decide a violation
    /// counts against the author; scoring never triggers it on its
    /// own. Failures are logged and swallowed.
    pub fn update_user_trust_score(&self, user_id: &str, violations: &[String], score: u8) {
        let penalty = violation_penalty(violations, score);

        match self.db.apply_trust_penalty(user_id, penalty) {
            Ok(updated) => debug!(
                user_id,
                penalty,
                trust_score = updated.trust_score,
                "Applied trust penalty"
            ),
            Err(err) => warn!(user_id, "Trust score update failed: {}", err),
        }
    }

    // === Statistics ===

    /// Aggregates statistics over all persisted audit rows.
    ///
    /// Returns empty statistics if the audit log cannot be read.
    pub fn get_safety_statistics(&self) -> SafetyStatistics {
        match self.db.all_audits() {
            Ok(audits) => SafetyStatistics::from_audits(&audits),
            Err(err) => {
                warn!("Audit scan failed, returning empty statistics: {}", err);
                SafetyStatistics::default()
            }
        }
    }

    // === Registry lifecycle ===

    /// Reloads the active banned keywords and swaps the registry
    /// snapshot wholesale.
    ///
    /// On load failure the registry is swapped to empty and scoring
    /// degrades to heuristics-only until the next successful refresh.
    pub fn refresh_banned_keywords(&self) {
        match self.db.load_active_keywords() {
            Ok(rows) => {
                let registry =
                    KeywordRegistry::from_entries(rows.into_iter().map(|r| r.into_entry()));
                info!("Loaded {} banned keywords", registry.len());
                self.registry.replace(registry);
            }
            Err(err) => {
                warn!(
                    "Keyword load failed, scoring degrades to heuristics-only: {}",
                    err
                );
                self.registry.replace(KeywordRegistry::empty());
            }
        }
    }

    /// Number of keywords in the current registry snapshot.
    pub fn keyword_count(&self) -> usize {
        self.registry.snapshot().len()
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    fn write_audit(&self, text: &str, result: &SafetyResult) {
        let record = NewAuditRecord {
            content_id: result.content_id.clone(),
            content_type: result.content_type,
            content_text: text.to_string(),
            safety_score: result.safety_score,
            violations: result.violations.clone(),
            is_approved: result.is_safe,
            is_flagged: result.requires_review,
        };

        if let Err(err) = self.db.record_audit(record) {
            warn!("Audit write failed, result still returned: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{KeywordScope, SafetyAction, Severity};
    use vigil_storage::NewBannedKeyword;

    fn keyword(keyword: &str, category: &str, severity: Severity) -> NewBannedKeyword {
        NewBannedKeyword {
            keyword: keyword.to_string(),
            category: category.to_string(),
            severity,
            scope: KeywordScope::Any,
        }
    }

    fn engine_with_keywords(keywords: Vec<NewBannedKeyword>) -> SafetyEngine {
        let db = Database::in_memory().unwrap();
        for kw in keywords {
            db.add_banned_keyword(kw).unwrap();
        }
        SafetyEngine::new(db)
    }

    // === Primary entry point ===

    #[test]
    fn clean_post_approves() {
        let engine = engine_with_keywords(vec![]);

        let result = engine.check_content_safety("hello world", ContentType::Post, None);
        assert_eq!(result.safety_score, 0);
        assert!(result.violations.is_empty());
        assert_eq!(result.action, SafetyAction::Approve);
        assert!(result.is_safe);
        assert!(!result.requires_review);
    }

    #[test]
    fn critical_keyword_blocks() {
        let engine =
            engine_with_keywords(vec![keyword("contraband", "weapons", Severity::Critical)]);

        let result =
            engine.check_content_safety("buy contraband here", ContentType::Comment, None);
        assert_eq!(result.safety_score, 100);
        assert_eq!(result.action, SafetyAction::Block);
        assert!(result.violations.contains(&"weapons".to_string()));
        assert_eq!(result.reason, "Content references weapons");
    }

    #[test]
    fn high_band_blocks_message_but_flags_post() {
        let engine = engine_with_keywords(vec![keyword("direword", "violence", Severity::High)]);

        let in_message = engine.check_message_safety("direword");
        assert_eq!(in_message.safety_score, 80);
        assert_eq!(in_message.action, SafetyAction::Block);

        let in_post = engine.check_content_safety("direword", ContentType::Post, None);
        assert_eq!(in_post.action, SafetyAction::Flag);
    }

    #[test]
    fn spam_heuristics_flow_through_policy() {
        let engine = engine_with_keywords(vec![]);

        let result = engine.check_content_safety(
            "BUY NOW http://spam.example.com CALL 555-123-4567!!!",
            ContentType::Comment,
            None,
        );
        assert!(result.safety_score >= 30);
        assert!(result.violations.contains(&"spam".to_string()));
        assert_eq!(result.reason, "Content appears to be spam");
    }

    #[test]
    fn verification_band_for_public_content() {
        // A low-severity keyword lands in the 30..=49 band.
        let engine = engine_with_keywords(vec![keyword("sketchy", "spam", Severity::Low)]);

        let bio = engine.check_bio_safety("a sketchy bio");
        assert_eq!(bio.safety_score, 20);
        assert_eq!(bio.action, SafetyAction::Approve);

        // Heuristic run (50) flags; caps (30) verifies for posts only.
        let post = engine.check_content_safety("WOWOWOWOW", ContentType::Post, None);
        assert_eq!(post.safety_score, 30);
        assert_eq!(post.action, SafetyAction::RequireVerification);

        let comment = engine.check_content_safety("WOWOWOWOW", ContentType::Comment, None);
        assert_eq!(comment.action, SafetyAction::Approve);
    }

    #[test]
    fn hate_speech_blocks_at_any_score() {
        let engine = engine_with_keywords(vec![keyword("slurword", "hate_speech", Severity::Low)]);

        let result = engine.check_comment_safety("that slurword again");
        assert_eq!(result.safety_score, 20);
        assert_eq!(result.action, SafetyAction::Block);
        assert_eq!(result.reason, "Content contains hate speech");
    }

    // === Audit trail ===

    #[test]
    fn checks_append_audit_rows() {
        let engine = engine_with_keywords(vec![]);

        engine.check_content_safety("first", ContentType::Post, Some("post-1"));
        engine.check_content_safety("second", ContentType::Post, Some("post-1"));

        let rows = engine.database().audits_for_content("post-1").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn audit_write_failure_does_not_affect_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.db");
        let db = Database::with_path(&path).unwrap();
        let engine = SafetyEngine::new(db);

        // Break the audit table behind the engine's back.
        let raw = rusqlite::Connection::open(&path).unwrap();
        raw.execute("DROP TABLE safety_audits", []).unwrap();
        drop(raw);

        let result = engine.check_content_safety("hello world", ContentType::Post, None);
        assert_eq!(result.action, SafetyAction::Approve);
        assert_eq!(result.safety_score, 0);
    }

    // === Wrappers ===

    #[test]
    fn post_wrapper_scores_title_and_body_together() {
        let engine = engine_with_keywords(vec![keyword("badword", "violence", Severity::High)]);

        let in_title = engine.check_post_safety("badword here", "clean body");
        assert_eq!(in_title.safety_score, 80);

        let in_body = engine.check_post_safety("clean title", "body with badword");
        assert_eq!(in_body.safety_score, 80);
    }

    #[test]
    fn wrappers_use_their_content_type() {
        let engine = engine_with_keywords(vec![]);

        assert_eq!(
            engine.check_comment_safety("x").content_type,
            ContentType::Comment
        );
        assert_eq!(
            engine.check_bio_safety("x").content_type,
            ContentType::ProfileBio
        );
        assert_eq!(
            engine.check_message_safety("x").content_type,
            ContentType::Message
        );
        assert_eq!(
            engine.check_community_description_safety("x").content_type,
            ContentType::CommunityDescription
        );
    }

    #[test]
    fn wrappers_are_ephemeral() {
        let engine = engine_with_keywords(vec![]);
        let result = engine.check_comment_safety("hello");
        assert!(result.content_id.is_none());
    }

    // === Trust scores ===

    #[test]
    fn trust_penalty_example() {
        let engine = engine_with_keywords(vec![]);

        let violations = vec!["hate_speech".to_string(), "spam".to_string()];
        engine.update_user_trust_score("u-1", &violations, 80);

        // floor(80/10) + 30 + 5 = 43.
        let score = engine.database().trust_score("u-1").unwrap();
        assert_eq!(score.trust_score, 57);
        assert_eq!(score.violations_count, 1);
    }

    #[test]
    fn scoring_never_touches_trust() {
        let engine = engine_with_keywords(vec![keyword("badword", "violence", Severity::High)]);

        engine.check_comment_safety("badword");
        let score = engine.database().trust_score("u-1").unwrap();
        assert_eq!(score.trust_score, 100);
        assert_eq!(score.violations_count, 0);
    }

    // === Statistics ===

    #[test]
    fn statistics_aggregate_audit_rows() {
        let engine = engine_with_keywords(vec![
            keyword("direword", "violence", Severity::High),
            keyword("contraband", "weapons", Severity::Critical),
        ]);

        engine.check_comment_safety("all clean"); // approve
        engine.check_comment_safety("direword"); // flag
        engine.check_comment_safety("contraband"); // block
        engine.check_comment_safety("soooooo spammy direword"); // flag, spam + violence

        let stats = engine.get_safety_statistics();
        assert_eq!(stats.total_checks, 4);
        assert_eq!(stats.flagged_content, 2);
        assert_eq!(stats.blocked_content, 1);
        assert_eq!(stats.top_violations[0].category, "violence");
        assert_eq!(stats.top_violations[0].count, 2);
    }

    // === Registry lifecycle ===

    #[test]
    fn refresh_picks_up_new_keywords() {
        let db = Database::in_memory().unwrap();
        let engine = SafetyEngine::new(db);

        assert_eq!(engine.keyword_count(), 0);
        let before = engine.check_comment_safety("fresh badword");
        assert_eq!(before.safety_score, 0);

        engine
            .database()
            .add_banned_keyword(keyword("badword", "violence", Severity::Medium))
            .unwrap();
        engine.refresh_banned_keywords();

        assert_eq!(engine.keyword_count(), 1);
        let after = engine.check_comment_safety("fresh badword");
        assert_eq!(after.safety_score, 50);
    }

    #[test]
    fn refresh_drops_deactivated_keywords() {
        let db = Database::in_memory().unwrap();
        let id = db
            .add_banned_keyword(keyword("badword", "violence", Severity::Medium))
            .unwrap();
        let engine = SafetyEngine::new(db);
        assert_eq!(engine.keyword_count(), 1);

        engine.database().deactivate_keyword(id).unwrap();
        engine.refresh_banned_keywords();

        assert_eq!(engine.keyword_count(), 0);
        assert_eq!(engine.check_comment_safety("badword").safety_score, 0);
    }

    #[test]
    fn failed_refresh_degrades_to_heuristics_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.db");
        let db = Database::with_path(&path).unwrap();
        db.add_banned_keyword(keyword("badword", "violence", Severity::High))
            .unwrap();
        let engine = SafetyEngine::new(db);
        assert_eq!(engine.keyword_count(), 1);

        let raw = rusqlite::Connection::open(&path).unwrap();
        raw.execute("DROP TABLE banned_keywords", []).unwrap();
        drop(raw);

        engine.refresh_banned_keywords();
        assert_eq!(engine.keyword_count(), 0);

        // Keyword scoring is gone, heuristics still work.
        assert_eq!(engine.check_comment_safety("badword").safety_score, 0);
        let spam = engine.check_comment_safety("soooooo");
        assert_eq!(spam.safety_score, 50);
    }

    #[test]
    fn injected_registry_is_shared() {
        let registry = SharedRegistry::new();
        let db = Database::in_memory().unwrap();
        db.add_banned_keyword(keyword("badword", "violence", Severity::Medium))
            .unwrap();

        let engine = SafetyEngine::with_registry(db, registry.clone());
        assert_eq!(engine.keyword_count(), 0);

        engine.refresh_banned_keywords();
        assert_eq!(registry.snapshot().len(), 1);
    }
}
