//! Aggregate statistics over persisted audit rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vigil_storage::AuditRecord;

/// Number of entries reported in `top_violations`.
const TOP_VIOLATIONS_LIMIT: usize = 10;

/// A violation category and how often it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationCount {
    /// The violation category label.
    pub category: String,
    /// Number of audit rows carrying this label.
    pub count: u64,
}

/// Aggregate safety statistics.
///
/// Computed by scanning every audit row and counting in memory; the
/// audit table is modest and the statistics call is rare, so there is
/// no pagination or streaming aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyStatistics {
    /// Total number of checks recorded.
    pub total_checks: u64,
    /// Checks that flagged content for review.
    pub flagged_content: u64,
    /// Checks that blocked content outright.
    pub blocked_content: u64,
    /// Most frequent violation categories, descending, capped at 10.
    pub top_violations: Vec<ViolationCount>,
}

impl SafetyStatistics {
    /// Builds statistics from a full scan of audit rows.
    pub fn from_audits(audits: &[AuditRecord]) -> Self {
        let total_checks = audits.len() as u64;
        let flagged_content = audits.iter().filter(|a| a.is_flagged).count() as u64;
        // A blocked check is neither approved nor held for review.
        let blocked_content = audits
            .iter()
            .filter(|a| !a.is_approved && !a.is_flagged)
            .count() as u64;

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for audit in audits {
            for violation in &audit.violations {
                *counts.entry(violation.as_str()).or_insert(0) += 1;
            }
        }

        let mut top_violations: Vec<ViolationCount> = counts
            .into_iter()
            .map(|(category, count)| ViolationCount {
                category: category.to_string(),
                count,
            })
            .collect();
        top_violations.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
        top_violations.truncate(TOP_VIOLATIONS_LIMIT);

        Self {
            total_checks,
            flagged_content,
            blocked_content,
            top_violations,
        }
    }
}
