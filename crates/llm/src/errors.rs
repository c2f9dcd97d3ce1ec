//! Errors raised inside the remote adapters.
//!
//! These never cross the [`triage::LlmGateway`] boundary; adapters log them
//! and return an empty response instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// The request could not be sent or timed out.
    #[error("LLM transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("LLM API returned HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },

    /// The provider answered 2xx but without any text content.
    #[error("LLM response had no text content")]
    NoContent,

    /// A configured backend name is not recognised.
    #[error("unknown LLM backend '{name}' (expected gemini, openai or stub)")]
    UnknownBackend {
        /// The offending name.
        name: String,
    },
}
