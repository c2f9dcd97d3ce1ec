//! Shared value types for the triage domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (confidence is in `[0.0, 1.0]`, criteria
//! text is never blank) and participate in triage decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Triage priority assigned to an issue.
///
/// Serialised in upper case (`"HIGH"`) to match the JSON shape the model is
/// asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Production impact, security exposure or critical infrastructure.
    High,
    /// Degraded non-production environments and pipelines.
    Medium,
    /// Everything else, including issues too vague to judge.
    Low,
}

impl Priority {
    /// Every priority, highest first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Returns the upper-case wire name (`"HIGH"`, `"MEDIUM"`, `"LOW"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    /// Returns the GitHub label carrying this priority (`"priority:high"`).
    pub fn label(self) -> String {
        format!("{PRIORITY_LABEL_PREFIX}{}", self.as_str().to_ascii_lowercase())
    }

    /// Parses an upper-case wire name. Any other spelling returns `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Priority::High),
            "MEDIUM" => Some(Priority::Medium),
            "LOW" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix shared by every priority label.
pub const PRIORITY_LABEL_PREFIX: &str = "priority:";

/// Returns `true` if `label` is a priority label, ignoring ASCII case.
pub fn is_priority_label(label: &str) -> bool {
    label
        .get(..PRIORITY_LABEL_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PRIORITY_LABEL_PREFIX))
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Model confidence in a verdict, in the range `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Creates a [`Confidence`], returning `None` if `value` is outside the
    /// valid range `[0.0, 1.0]` or not finite.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Confidence of exactly zero.
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Returns the confidence as an `f64` in `[0.0, 1.0]`.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Returns the smaller of `self` and `cap`.
    pub fn capped_at(self, cap: Confidence) -> Self {
        Self(self.0.min(cap.0))
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Human-authored priority rules injected verbatim into the system prompt.
///
/// Loaded once at startup and shared read-only for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaText(String);

impl CriteriaText {
    /// Wraps criteria text, returning `None` if it is empty or whitespace-only.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Returns the criteria text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
