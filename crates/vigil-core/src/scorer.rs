//! Content scorer: banned keyword matching plus structural heuristics.
//!
//! Scoring is a pure, synchronous computation over the input text and
//! a registry snapshot. There is no I/O on this path and no failure
//! mode by construction; an empty registry simply degrades scoring to
//! heuristics-only.

use std::collections::BTreeSet;

use regex::Regex;

use crate::registry::KeywordRegistry;
use crate::types::{category, ContentType, Severity};

/// Caps-ratio heuristic: triggers above this share of uppercase chars.
const CAPS_RATIO_THRESHOLD: f64 = 0.7;
const CAPS_SCORE: u8 = 30;

/// Special-character heuristic: triggers above this share of symbols.
const SPECIAL_RATIO_THRESHOLD: f64 = 0.3;
const SPECIAL_SCORE: u8 = 40;

/// Repeated-character heuristic: a run of this length triggers.
const REPEAT_RUN_LEN: usize = 5;
const REPEAT_SCORE: u8 = 50;

const PHONE_SCORE: u8 = 20;
const EMAIL_SCORE: u8 = 20;
const URL_SCORE: u8 = 30;

/// Characters counted by the special-character heuristic.
const SPECIAL_CHARS: &str = r#"!@#$%^&*()_+={}[]|\:";'<>?,./"#;

/// Outcome of scoring a single piece of text.
#[derive(Debug, Clone, Default)]
pub struct ScoreOutcome {
    /// Overall score, 0 to 100. Contributions combine via max, so the
    /// score never exceeds the strongest single signal.
    pub score: u8,
    /// Deduplicated violation category labels.
    pub violations: BTreeSet<String>,
    /// Highest severity across all keyword hits, if any matched.
    pub max_severity: Option<Severity>,
}

impl ScoreOutcome {
    /// Violations as a sorted vector (BTreeSet iteration order).
    pub fn violations_vec(&self) -> Vec<String> {
        self.violations.iter().cloned().collect()
    }
}

/// Rule-based content scorer.
///
/// Detector regexes are compiled once at construction; `score` is
/// cheap and can be called concurrently from any number of threads.
pub struct Scorer {
    phone: Regex,
    email: Regex,
    url: Regex,
}

impl Scorer {
    /// Creates a scorer with the standard detectors.
    pub fn new() -> Self {
        // 3-3-4 digit grouping with optional separators.
        let phone = Regex::new(r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("Invalid phone regex");
        let email = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("Invalid email regex");
        let url = Regex::new(r"https?://\S+").expect("Invalid URL regex");

        Self { phone, email, url }
    }

    /// Scores `text` against the registry snapshot and the structural
    /// heuristics.
    ///
    /// Keyword matching is case-insensitive substring containment,
    /// filtered to entries whose scope covers `content_type`. The
    /// heuristics run against the original text (the caps-ratio check
    /// would be meaningless after lower-casing). Every contribution
    /// combines into the score via max.
    pub fn score(
        &self,
        text: &str,
        content_type: ContentType,
        registry: &KeywordRegistry,
    ) -> ScoreOutcome {
        let mut outcome = ScoreOutcome::default();

        if text.is_empty() {
            return outcome;
        }

        let lowered = text.to_lowercase();

        for entry in registry.entries() {
            if !entry.scope.applies_to(content_type) {
                continue;
            }
            // An empty keyword would match every text.
            if entry.keyword.is_empty() {
                continue;
            }
            if lowered.contains(&entry.keyword) {
                outcome.violations.insert(entry.category.clone());
                outcome.score = outcome.score.max(entry.severity.score());
                outcome.max_severity = Some(match outcome.max_severity {
                    Some(current) => current.max(entry.severity),
                    None => entry.severity,
                });
            }
        }

        self.apply_heuristics(text, &mut outcome);

        outcome
    }

    /// Runs the four structural heuristics against the original text.
    fn apply_heuristics(&self, text: &str, outcome: &mut ScoreOutcome) {
        let total = text.chars().count();
        if total == 0 {
            return;
        }

        let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
        if uppercase as f64 / total as f64 > CAPS_RATIO_THRESHOLD {
            Self::spam_hit(outcome, CAPS_SCORE);
        }

        let special = text.chars().filter(|c| SPECIAL_CHARS.contains(*c)).count();
        if special as f64 / total as f64 > SPECIAL_RATIO_THRESHOLD {
            Self::spam_hit(outcome, SPECIAL_SCORE);
        }

        if has_repeated_run(text, REPEAT_RUN_LEN) {
            Self::spam_hit(outcome, REPEAT_SCORE);
        }

        if self.phone.is_match(text) {
            Self::spam_hit(outcome, PHONE_SCORE);
        }
        if self.email.is_match(text) {
            Self::spam_hit(outcome, EMAIL_SCORE);
        }
        if self.url.is_match(text) {
            Self::spam_hit(outcome, URL_SCORE);
        }
    }

    fn spam_hit(outcome: &mut ScoreOutcome, contribution: u8) {
        outcome.score = outcome.score.max(contribution);
        outcome.violations.insert(category::SPAM.to_string());
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if any character repeats at least `run_len` times
/// consecutively.
fn has_repeated_run(text: &str, run_len: usize) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= run_len {
            return true;
        }
    }

    false
}
