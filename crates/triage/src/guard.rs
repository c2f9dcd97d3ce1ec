//! Deterministic override for low-information issues.
//!
//! Runs after validation and fallback, unconditionally. A model that claims
//! HIGH urgency for a two-word issue is overridden here.

use crate::types::Confidence;
use crate::verdict::{TriageResult, GENERIC_MISSING_INFO_REQUEST};

/// Sentinel rule recorded when the guard fires.
pub const INSUFFICIENT_INFO_RULE: &str = "Rule D: Insufficient Information";

/// Issues with fewer words than this (title and body combined) are vague.
pub const MIN_WORD_COUNT: usize = 10;

/// Upper bound on confidence for a guarded verdict.
pub const VAGUE_CONFIDENCE_CAP: f64 = 0.2;

const VAGUE_REASONING: &str = "Issue too vague to triage confidently; requesting more details.";

/// Counts whitespace-separated words in `title` and `body` combined.
pub fn word_count(title: &str, body: Option<&str>) -> usize {
    format!("{} {}", title, body.unwrap_or_default())
        .split_whitespace()
        .count()
}

/// Returns `true` if the issue text is too short to triage.
pub fn is_vague(title: &str, body: Option<&str>) -> bool {
    word_count(title, body) < MIN_WORD_COUNT
}

/// Downgrades `result` to LOW when the issue text is vague; otherwise
/// returns it unchanged.
///
/// Idempotent: the sentinel rule is appended only if absent, and an existing
/// list of clarification requests is kept.
pub fn apply(result: TriageResult, title: &str, body: Option<&str>) -> TriageResult {
    if !is_vague(title, body) {
        return result;
    }

    tracing::info!(
        words = word_count(title, body),
        original_priority = %result.priority(),
        "Issue too vague; forcing LOW priority"
    );

    let mut matched_rules = result.matched_rules().to_vec();
    if !matched_rules.iter().any(|r| r == INSUFFICIENT_INFO_RULE) {
        matched_rules.push(INSUFFICIENT_INFO_RULE.to_string());
    }

    let missing_info_requests = if result.missing_info_requests().is_empty() {
        vec![GENERIC_MISSING_INFO_REQUEST.to_string()]
    } else {
        result.missing_info_requests().to_vec()
    };

    let cap = Confidence::new(VAGUE_CONFIDENCE_CAP).unwrap_or_else(Confidence::zero);
    TriageResult::low_priority(
        VAGUE_REASONING,
        result.confidence().capped_at(cap),
        matched_rules,
        missing_info_requests,
    )
}
