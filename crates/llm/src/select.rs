//! Configuration-driven backend selection.

use triage::LlmGateway;

use crate::gemini::GeminiGateway;
use crate::openai::OpenAiGateway;
use crate::settings::{LlmBackend, LlmSettings};
use crate::stub::KeywordStub;

/// Builds the backend for one triage call.
///
/// The keyword stub is used when it is forced, when it is the configured
/// backend, or when the configured remote backend has no API key. `http` is
/// shared so every call reuses the same connection pool.
pub fn select_gateway(settings: &LlmSettings, http: &reqwest::Client) -> Box<dyn LlmGateway> {
    if settings.force_stub {
        return Box::new(KeywordStub);
    }

    match settings.backend {
        LlmBackend::Stub => Box::new(KeywordStub),
        LlmBackend::Gemini => match &settings.gemini.api_key {
            Some(key) => Box::new(GeminiGateway::new(
                http.clone(),
                key.clone(),
                &settings.gemini.model,
                &settings.gemini.api_base,
                settings.timeout,
            )),
            None => {
                tracing::warn!("GEMINI_API_KEY not set; using keyword stub backend");
                Box::new(KeywordStub)
            }
        },
        LlmBackend::OpenAi => match &settings.openai.api_key {
            Some(key) => Box::new(OpenAiGateway::new(
                http.clone(),
                key.clone(),
                &settings.openai.model,
                &settings.openai.api_base,
                settings.timeout,
            )),
            None => {
                tracing::warn!("OPENAI_API_KEY not set; using keyword stub backend");
                Box::new(KeywordStub)
            }
        },
    }
}
