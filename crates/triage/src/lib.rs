//! Triage decision domain for issue-triager.
//!
//! This crate turns an issue and an unreliable language-model response into a
//! strongly-typed, policy-compliant [`TriageResult`]. Infrastructure crates
//! implement the [`LlmGateway`] port defined here; they never add triage rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a verdict is and how one is derived; the `llm`, `github`
//! and `listener` crates define *how* to talk to the outside world.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryName`, `IssueNumber`, `TriageRunId`) |
//! | [`types`] | Value types (`Priority`, `Confidence`, `CriteriaText`, `Timestamp`) |
//! | [`errors`] | Parse, validation and configuration errors |
//! | [`verdict`] | [`TriageResult`] and the fallback verdict |
//! | [`prompt`] | System/user prompt rendering |
//! | [`normalize`] | Fence stripping and field coercion of raw model text |
//! | [`validate`] | Invariant checks producing a [`TriageResult`] |
//! | [`guard`] | Vague-issue override |
//! | [`gateway`] | The [`LlmGateway`] port |
//! | [`pipeline`] | [`TriagePipeline`] orchestration |
//! | [`comment`] | Issue comment rendering |

pub mod comment;
pub mod errors;
pub mod gateway;
pub mod guard;
pub mod identifiers;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod types;
pub mod validate;
pub mod verdict;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use comment::render_comment;
pub use errors::{ErrorKind, ParseError, TriageError, ValidationError};
pub use gateway::LlmGateway;
pub use guard::INSUFFICIENT_INFO_RULE;
pub use identifiers::{IssueNumber, RepositoryName, TriageRunId};
pub use pipeline::{interpret, IssueDraft, TriageContext, TriagePipeline};
pub use prompt::{build_prompts, PromptPair};
pub use types::{Confidence, CriteriaText, Priority, Timestamp};
pub use verdict::{
    TriageResult, VerdictParts, FALLBACK_RULE, GENERIC_MISSING_INFO_REQUEST,
    TRIAGE_SCHEMA_VERSION,
};
