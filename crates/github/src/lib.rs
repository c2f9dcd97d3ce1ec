//! issue-triager GitHub adapter.
//!
//! Applies a [`triage::TriageResult`] to an issue: one `priority:<p>` label
//! and one comment summarising the verdict. In dry-run mode the
//! [`ActionExecutor`] reports the planned actions without calling GitHub.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain triage rules. All GitHub
//! API details (authentication, headers, endpoints) are handled here; the
//! [`triage`] crate never sees them.

pub mod client;
pub mod errors;
pub mod executor;
pub mod settings;

pub use client::GitHubClient;
pub use errors::GitHubError;
pub use executor::{ActionExecutor, ActionReport, IssueRef, Notification, PlannedAction};
pub use settings::{GitHubSettings, GitHubToken};
