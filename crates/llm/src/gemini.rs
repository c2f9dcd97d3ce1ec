//! Google Gemini `generateContent` adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use triage::{ErrorKind, LlmGateway};

use crate::errors::LlmError;
use crate::settings::ApiKey;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiGateway {
    http: reqwest::Client,
    api_key: ApiKey,
    endpoint: String,
    timeout: Duration,
}

impl GeminiGateway {
    /// Builds an adapter for `model` (with or without the `models/` prefix).
    pub fn new(
        http: reqwest::Client,
        api_key: ApiKey,
        model: &str,
        api_base: &str,
        timeout: Duration,
    ) -> Self {
        let endpoint = format!(
            "{}/v1beta/{}:generateContent",
            api_base.trim_end_matches('/'),
            normalize_model(model)
        );
        Self {
            http,
            api_key,
            endpoint,
            timeout,
        }
    }

    async fn request(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: user_prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.0,
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.expose())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::NoContent);
        }
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[tracing::instrument(name = "gemini.generate", skip_all, fields(endpoint = %self.endpoint))]
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> String {
        match self.request(system_prompt, user_prompt).await {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(
                    %error,
                    kind = ErrorKind::Transport.as_str(),
                    "Gemini API call failed"
                );
                String::new()
            }
        }
    }
}

fn normalize_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_model() {
        assert_eq!(normalize_model("gemini-1.5-flash"), "models/gemini-1.5-flash");
        assert_eq!(normalize_model("models/gemini-pro"), "models/gemini-pro");
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: "sys".to_string(),
                }],
            },
            contents: vec![],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.0,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }
}
