//! Trust score penalty computation.
//!
//! Pure math only; the storage layer applies the subtraction against
//! the persisted trust score (which starts at 100 and floors at 0).

use crate::types::category;

/// Maximum penalty applied for a single violating check.
const MAX_PENALTY: u32 = 100;

/// Fixed penalty add-ons per violation category.
const PEDOPHILIA_PENALTY: u32 = 50;
const HATE_SPEECH_PENALTY: u32 = 30;
const SEXUAL_PENALTY: u32 = 20;
const WEAPONS_PENALTY: u32 = 15;
const DRUGS_PENALTY: u32 = 15;
const SPAM_PENALTY: u32 = 5;

/// Computes the trust penalty for a violating check.
///
/// The penalty is `score / 10` plus a fixed add-on per category
/// present, capped at 100. Nudity and sexual content share one add-on
/// counted at most once.
pub fn violation_penalty(violations: &[String], score: u8) -> u32 {
    let mut penalty = u32::from(score) / 10;

    let has = |label: &str| violations.iter().any(|v| v == label);

    if has(category::PEDOPHILIA) {
        penalty += PEDOPHILIA_PENALTY;
    }
    if has(category::HATE_SPEECH) {
        penalty += HATE_SPEECH_PENALTY;
    }
    if has(category::NUDITY) || has(category::SEXUAL_CONTENT) {
        penalty += SEXUAL_PENALTY;
    }
    if has(category::WEAPONS) {
        penalty += WEAPONS_PENALTY;
    }
    if has(category::DRUGS) {
        penalty += DRUGS_PENALTY;
    }
    if has(category::SPAM) {
        penalty += SPAM_PENALTY;
    }

    penalty.min(MAX_PENALTY)
}
