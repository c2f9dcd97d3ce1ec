//! The canonical triage verdict.
//!
//! A [`TriageResult`] can only be obtained through [`TriageResult::new`], which
//! enforces every invariant, or through the fixed constructors used by the
//! fallback and vague-issue paths. Once built it is never mutated.

use serde::Serialize;

use crate::errors::ValidationError;
use crate::types::{is_priority_label, Confidence, Priority};

/// Version of the verdict JSON shape (`action_required` +
/// `missing_info_requests`). Bumped on any breaking change to field names.
pub const TRIAGE_SCHEMA_VERSION: u32 = 1;

/// Sentinel rule recorded when model output was unusable.
pub const FALLBACK_RULE: &str = "Fallback:InvalidLLMOutput";

/// Clarification request shown when the reporter needs to add detail.
pub const GENERIC_MISSING_INFO_REQUEST: &str =
    "Please provide environment, error logs, and steps to reproduce.";

const FALLBACK_REASONING: &str = "LLM output invalid; requesting more information.";

/// Unvalidated verdict fields with typed priority and raw confidence.
///
/// Passed to [`TriageResult::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictParts {
    pub priority: Priority,
    pub action_required: bool,
    pub labels: Vec<String>,
    pub reasoning: String,
    pub confidence: f64,
    pub matched_rules: Vec<String>,
    pub missing_info_requests: Vec<String>,
}

/// A validated, immutable triage verdict for one issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageResult {
    priority: Priority,
    action_required: bool,
    labels: Vec<String>,
    reasoning: String,
    confidence: Confidence,
    matched_rules: Vec<String>,
    missing_info_requests: Vec<String>,
}

impl TriageResult {
    /// Builds a verdict, rejecting parts that break an invariant:
    ///
    /// - confidence must be finite and within `[0.0, 1.0]`;
    /// - reasoning must contain a non-whitespace character;
    /// - labels must hold exactly one priority label, and it must equal
    ///   `priority:<priority>` (compared case-insensitively).
    pub fn new(parts: VerdictParts) -> Result<Self, ValidationError> {
        let confidence =
            Confidence::new(parts.confidence).ok_or(ValidationError::ConfidenceOutOfRange {
                value: parts.confidence,
            })?;

        if parts.reasoning.trim().is_empty() {
            return Err(ValidationError::EmptyReasoning);
        }

        check_priority_labels(parts.priority, &parts.labels)?;

        Ok(Self {
            priority: parts.priority,
            action_required: parts.action_required,
            labels: parts.labels,
            reasoning: parts.reasoning,
            confidence,
            matched_rules: parts.matched_rules,
            missing_info_requests: parts.missing_info_requests,
        })
    }

    /// The fixed safe verdict used when model output cannot be used.
    pub fn fallback() -> Self {
        Self {
            priority: Priority::Low,
            action_required: false,
            labels: vec![Priority::Low.label()],
            reasoning: FALLBACK_REASONING.to_string(),
            confidence: Confidence::zero(),
            matched_rules: vec![FALLBACK_RULE.to_string()],
            missing_info_requests: vec![GENERIC_MISSING_INFO_REQUEST.to_string()],
        }
    }

    /// A LOW verdict built from already-valid parts. Used by the vague-issue
    /// guard.
    pub(crate) fn low_priority(
        reasoning: &str,
        confidence: Confidence,
        matched_rules: Vec<String>,
        missing_info_requests: Vec<String>,
    ) -> Self {
        Self {
            priority: Priority::Low,
            action_required: false,
            labels: vec![Priority::Low.label()],
            reasoning: reasoning.to_string(),
            confidence,
            matched_rules,
            missing_info_requests,
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Whether the on-call rotation should be notified.
    pub fn action_required(&self) -> bool {
        self.action_required
    }

    /// Labels to apply; the first is always the priority label.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Rules that influenced the verdict, in application order.
    pub fn matched_rules(&self) -> &[String] {
        &self.matched_rules
    }

    pub fn missing_info_requests(&self) -> &[String] {
        &self.missing_info_requests
    }

    /// Returns `true` if this is the unmodified fallback verdict.
    pub fn is_fallback(&self) -> bool {
        self.matched_rules.iter().any(|r| r == FALLBACK_RULE)
    }
}

fn check_priority_labels(priority: Priority, labels: &[String]) -> Result<(), ValidationError> {
    let expected = priority.label();
    let mut matches = 0;
    for label in labels.iter().filter(|l| is_priority_label(l)) {
        if label.eq_ignore_ascii_case(&expected) {
            matches += 1;
        } else {
            return Err(ValidationError::MismatchedPriorityLabel {
                expected,
                found: label.clone(),
            });
        }
    }
    match matches {
        0 => Err(ValidationError::MissingPriorityLabel { expected }),
        1 => Ok(()),
        count => Err(ValidationError::DuplicatePriorityLabel { expected, count }),
    }
}
