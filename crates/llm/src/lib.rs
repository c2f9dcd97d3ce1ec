//! issue-triager LLM backends.
//!
//! Implements the [`triage::LlmGateway`] trait for Google Gemini and OpenAI
//! chat completions, plus a deterministic [`KeywordStub`] for tests and for
//! environments without live credentials. Additional providers are added as
//! new adapters in this crate without any changes to the `triage` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting and response parsing
//! live here. The [`triage`] crate sees only [`triage::LlmGateway`].
//!
//! ## Failure model
//!
//! Remote adapters never return an error to the pipeline. Transport failures,
//! timeouts and non-success statuses are logged at error level and surface as
//! an empty response. There is no retry at this layer.

pub mod errors;
pub mod gemini;
pub mod openai;
pub mod select;
pub mod settings;
pub mod stub;

pub use errors::LlmError;
pub use gemini::GeminiGateway;
pub use openai::OpenAiGateway;
pub use select::select_gateway;
pub use settings::{ApiKey, LlmBackend, LlmSettings, ProviderSettings};
pub use stub::KeywordStub;
