//! Port for language-model backends.
//!
//! Infrastructure crates implement [`LlmGateway`]; this crate only calls it.

use async_trait::async_trait;

/// A text-generation backend.
///
/// `generate` never fails. Implementations absorb transport and API errors
/// and return an empty string, which the pipeline treats like any other
/// unusable output.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Short backend name for logs (`"gemini"`, `"openai"`, `"stub"`).
    fn name(&self) -> &'static str;

    /// Sends both prompts as one request and returns the raw response text.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> String;
}
