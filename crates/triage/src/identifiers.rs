//! Newtype domain identifiers.
//!
//! Every concept that has an identity is represented as a distinct newtype
//! wrapping a primitive, so an issue number can never be passed where some
//! other integer is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifiers: GitHub-assigned
// ---------------------------------------------------------------------------

/// The per-repository number GitHub assigns to an issue (`#42`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueNumber(u64);

impl IssueNumber {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a GitHub repository in `"owner/repo"` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Returns `None` if `value` is empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies one triage run (one webhook delivery or one CLI invocation).
///
/// Recorded on the tracing span of the run and echoed back in the webhook
/// response so log lines can be correlated with a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriageRunId(Uuid);

impl TriageRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TriageRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
