//! Action policy: maps a score and violation set to a disposition.
//!
//! The decision table is evaluated top to bottom, first match wins.
//! Messages are point-to-point and higher-risk for harassment, so the
//! score band that merely flags public content blocks a message.
//! Posts and profile bios are public-facing and get an extra
//! verification gate at a lower threshold.

use std::collections::BTreeSet;

use crate::types::{category, ContentType, SafetyAction, Severity};

/// Score at or above which content always blocks.
const BLOCK_SCORE: u8 = 90;
/// Score at or above which content blocks for messages, flags otherwise.
const HIGH_SCORE: u8 = 70;
/// Score at or above which content flags.
const FLAG_SCORE: u8 = 50;
/// Score at or above which public content requires verification.
const VERIFY_SCORE: u8 = 30;

/// Computes the disposition for a scored piece of content.
///
/// Decision table, first match wins:
/// 1. `pedophilia` or `hate_speech` present, or score >= 90: block.
/// 2. score >= 70: block for messages, flag otherwise.
/// 3. score >= 50: flag.
/// 4. score >= 30 and the content is a post or profile bio: require
///    verification. Other content types in this band fall through.
/// 5. approve.
pub fn decide(
    score: u8,
    violations: &BTreeSet<String>,
    content_type: ContentType,
) -> SafetyAction {
    if violations.contains(category::PEDOPHILIA)
        || violations.contains(category::HATE_SPEECH)
        || score >= BLOCK_SCORE
    {
        return SafetyAction::Block;
    }

    if score >= HIGH_SCORE {
        return if content_type == ContentType::Message {
            SafetyAction::Block
        } else {
            SafetyAction::Flag
        };
    }

    if score >= FLAG_SCORE {
        return SafetyAction::Flag;
    }

    if score >= VERIFY_SCORE
        && matches!(content_type, ContentType::Post | ContentType::ProfileBio)
    {
        return SafetyAction::RequireVerification;
    }

    SafetyAction::Approve
}

/// Derives the human-readable reason for a disposition.
///
/// Violations are checked in a fixed priority order; the first
/// matching category wins, independent of the numeric score.
pub fn reason(violations: &BTreeSet<String>, max_severity: Option<Severity>) -> String {
    if violations.contains(category::PEDOPHILIA) {
        return "Content contains child safety violations".to_string();
    }
    if violations.contains(category::HATE_SPEECH) {
        return "Content contains hate speech".to_string();
    }
    if violations.contains(category::NUDITY) || violations.contains(category::SEXUAL_CONTENT) {
        return "Content contains sexual or explicit material".to_string();
    }
    if violations.contains(category::WEAPONS) {
        return "Content references weapons".to_string();
    }
    if violations.contains(category::DRUGS) {
        return "Content references drugs".to_string();
    }
    if violations.contains(category::SPAM) {
        return "Content appears to be spam".to_string();
    }
    if violations.contains(category::VIOLENCE) {
        return "Content contains violent language".to_string();
    }

    match max_severity {
        Some(severity) if !violations.is_empty() => {
            format!("Flagged due to {} severity violations", severity.as_str())
        }
        _ if !violations.is_empty() => "Flagged due to policy violations".to_string(),
        _ => "Content passed all safety checks".to_string(),
    }
}
