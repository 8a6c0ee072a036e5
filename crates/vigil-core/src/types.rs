//! Shared types for content safety scoring.

use serde::{Deserialize, Serialize};

/// Well-known violation category labels.
///
/// Categories are free-form strings sourced from the banned keyword
/// list; these constants cover the labels the action policy and trust
/// penalty give special treatment to.
pub mod category {
    /// Child safety violations. Always blocks.
    pub const PEDOPHILIA: &str = "pedophilia";
    /// Hate speech or discrimination. Always blocks.
    pub const HATE_SPEECH: &str = "hate_speech";
    /// Nudity.
    pub const NUDITY: &str = "nudity";
    /// Sexually explicit material.
    pub const SEXUAL_CONTENT: &str = "sexual_content";
    /// Weapons references.
    pub const WEAPONS: &str = "weapons";
    /// Drug references.
    pub const DRUGS: &str = "drugs";
    /// Spam patterns (also emitted by the structural heuristics).
    pub const SPAM: &str = "spam";
    /// Violent language.
    pub const VIOLENCE: &str = "violence";
}

/// The kind of user-generated content being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// A public post (title + body).
    Post,
    /// A comment on a post.
    Comment,
    /// A user profile biography.
    ProfileBio,
    /// A direct message.
    Message,
    /// A community description.
    CommunityDescription,
}

impl ContentType {
    /// Returns all content types.
    pub fn all() -> &'static [ContentType] {
        &[
            ContentType::Post,
            ContentType::Comment,
            ContentType::ProfileBio,
            ContentType::Message,
            ContentType::CommunityDescription,
        ]
    }

    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Comment => "comment",
            ContentType::ProfileBio => "profile_bio",
            ContentType::Message => "message",
            ContentType::CommunityDescription => "community_description",
        }
    }

    /// Parse from the database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(ContentType::Post),
            "comment" => Some(ContentType::Comment),
            "profile_bio" => Some(ContentType::ProfileBio),
            "message" => Some(ContentType::Message),
            "community_description" => Some(ContentType::CommunityDescription),
            _ => None,
        }
    }
}

/// Severity of a banned keyword.
///
/// Ordering is `Low < Medium < High < Critical`; the scorer keeps the
/// highest severity seen across all keyword hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor violation.
    Low,
    /// Moderate violation.
    Medium,
    /// Serious violation.
    High,
    /// Most severe violation.
    Critical,
}

impl Severity {
    /// Score contribution for a keyword hit at this severity.
    pub fn score(&self) -> u8 {
        match self {
            Severity::Low => 20,
            Severity::Medium => 50,
            Severity::High => 80,
            Severity::Critical => 100,
        }
    }

    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Parse from the database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// Which content types a banned keyword applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordScope {
    /// Applies to every content type.
    Any,
    /// Applies only to the given content type.
    Only(ContentType),
}

impl KeywordScope {
    /// Returns true if a keyword with this scope applies to `content_type`.
    pub fn applies_to(&self, content_type: ContentType) -> bool {
        match self {
            KeywordScope::Any => true,
            KeywordScope::Only(ct) => *ct == content_type,
        }
    }

    /// Database string representation.
    pub fn to_db_string(&self) -> String {
        match self {
            KeywordScope::Any => "any".to_string(),
            KeywordScope::Only(ct) => ct.as_str().to_string(),
        }
    }

    /// Parse from the database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        if s == "any" {
            Some(KeywordScope::Any)
        } else {
            ContentType::parse(s).map(KeywordScope::Only)
        }
    }
}

/// Disposition for a checked piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyAction {
    /// Content is allowed through.
    #[default]
    Approve,
    /// Content is held for moderator review.
    Flag,
    /// Content is rejected.
    Block,
    /// Content requires identity verification before publishing.
    RequireVerification,
}

impl SafetyAction {
    /// Returns a human-readable name for this action.
    pub fn name(&self) -> &'static str {
        match self {
            SafetyAction::Approve => "Approve",
            SafetyAction::Flag => "Flag",
            SafetyAction::Block => "Block",
            SafetyAction::RequireVerification => "Require Verification",
        }
    }

    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyAction::Approve => "approve",
            SafetyAction::Flag => "flag",
            SafetyAction::Block => "block",
            SafetyAction::RequireVerification => "require_verification",
        }
    }

    /// Parse from the database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(SafetyAction::Approve),
            "flag" => Some(SafetyAction::Flag),
            "block" => Some(SafetyAction::Block),
            "require_verification" => Some(SafetyAction::RequireVerification),
            _ => None,
        }
    }

    /// Returns true if the content is safe to publish as-is.
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyAction::Approve)
    }

    /// Returns true if the content needs human or identity review.
    pub fn requires_review(&self) -> bool {
        matches!(self, SafetyAction::Flag | SafetyAction::RequireVerification)
    }
}

/// Result of a single safety check. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyResult {
    /// Opaque reference to the content item, if the check is tied to one.
    pub content_id: Option<String>,
    /// The kind of content that was checked.
    pub content_type: ContentType,
    /// Overall score, 0 (clean) to 100 (worst).
    pub safety_score: u8,
    /// Deduplicated, sorted violation category labels.
    pub violations: Vec<String>,
    /// Derived: action is Approve.
    pub is_safe: bool,
    /// Derived: action is Flag or RequireVerification.
    pub requires_review: bool,
    /// The computed disposition.
    pub action: SafetyAction,
    /// Human-readable explanation for the disposition.
    pub reason: String,
}

impl SafetyResult {
    /// Creates a result from its parts, filling in the derived fields.
    pub fn new(
        content_id: Option<String>,
        content_type: ContentType,
        safety_score: u8,
        violations: Vec<String>,
        action: SafetyAction,
        reason: String,
    ) -> Self {
        Self {
            content_id,
            content_type,
            safety_score,
            violations,
            is_safe: action.is_safe(),
            requires_review: action.requires_review(),
            action,
            reason,
        }
    }

    /// Creates an approve result for clean content.
    pub fn approved(content_id: Option<String>, content_type: ContentType) -> Self {
        Self::new(
            content_id,
            content_type,
            0,
            Vec::new(),
            SafetyAction::Approve,
            "Content passed all safety checks".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_all_returns_all_variants() {
        assert_eq!(ContentType::all().len(), 5);
    }

    #[test]
    fn content_type_round_trips_through_db_string() {
        for ct in ContentType::all() {
            assert_eq!(ContentType::parse(ct.as_str()), Some(*ct));
        }
        assert_eq!(ContentType::parse("unknown"), None);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_scores() {
        assert_eq!(Severity::Low.score(), 20);
        assert_eq!(Severity::Medium.score(), 50);
        assert_eq!(Severity::High.score(), 80);
        assert_eq!(Severity::Critical.score(), 100);
    }

    #[test]
    fn scope_any_applies_everywhere() {
        for ct in ContentType::all() {
            assert!(KeywordScope::Any.applies_to(*ct));
        }
    }

    #[test]
    fn scope_only_applies_to_one_type() {
        let scope = KeywordScope::Only(ContentType::Message);
        assert!(scope.applies_to(ContentType::Message));
        assert!(!scope.applies_to(ContentType::Post));
    }

    #[test]
    fn scope_db_string_round_trip() {
        assert_eq!(KeywordScope::parse("any"), Some(KeywordScope::Any));
        assert_eq!(
            KeywordScope::parse("post"),
            Some(KeywordScope::Only(ContentType::Post))
        );
        assert_eq!(KeywordScope::parse("bogus"), None);
        assert_eq!(KeywordScope::Any.to_db_string(), "any");
        assert_eq!(
            KeywordScope::Only(ContentType::Comment).to_db_string(),
            "comment"
        );
    }

    #[test]
    fn action_default_is_approve() {
        assert_eq!(SafetyAction::default(), SafetyAction::Approve);
    }

    #[test]
    fn action_derived_predicates() {
        assert!(SafetyAction::Approve.is_safe());
        assert!(!SafetyAction::Approve.requires_review());
        assert!(SafetyAction::Flag.requires_review());
        assert!(SafetyAction::RequireVerification.requires_review());
        assert!(!SafetyAction::Block.requires_review());
        assert!(!SafetyAction::Block.is_safe());
    }

    #[test]
    fn action_serialization() {
        assert_eq!(
            serde_json::to_string(&SafetyAction::RequireVerification).unwrap(),
            "\"require_verification\""
        );
        assert_eq!(
            serde_json::to_string(&SafetyAction::Block).unwrap(),
            "\"block\""
        );
    }

    #[test]
    fn safety_result_fills_derived_fields() {
        let result = SafetyResult::new(
            Some("c1".to_string()),
            ContentType::Comment,
            55,
            vec!["spam".to_string()],
            SafetyAction::Flag,
            "Content appears to be spam".to_string(),
        );
        assert!(!result.is_safe);
        assert!(result.requires_review);
    }

    #[test]
    fn approved_result_is_clean() {
        let result = SafetyResult::approved(None, ContentType::Post);
        assert_eq!(result.safety_score, 0);
        assert!(result.violations.is_empty());
        assert!(result.is_safe);
        assert!(!result.requires_review);
    }
}
