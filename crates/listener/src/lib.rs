//! issue-triager webhook receiver.
//!
//! Binds an HTTP server that receives GitHub `issues` webhook deliveries,
//! validates the HMAC-SHA256 signature of every request when a secret is
//! configured, filters events and actions, and hands accepted issues to the
//! [`triage::TriagePipeline`] and the [`github::ActionExecutor`].
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET` | `/health` | Liveness probe |
//! | `POST` | `/webhook/github` | GitHub webhook delivery |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport details, header handling and payload
//! deserialisation live here. The [`triage`] crate sees only an
//! [`triage::IssueDraft`].

pub mod errors;
pub mod payload;
pub mod server;
pub mod settings;
pub mod signature;

pub use errors::WebhookError;
pub use payload::{sample_issue_payload, IssuesEvent};
pub use server::{router, serve, AppState};
pub use settings::{WebhookSecret, WebhookSettings};
pub use signature::{sign, verify_signature, SIGNATURE_HEADER};
