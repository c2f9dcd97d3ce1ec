//! OpenAI chat-completions adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use triage::{ErrorKind, LlmGateway};

use crate::errors::LlmError;
use crate::settings::ApiKey;

pub struct OpenAiGateway {
    http: reqwest::Client,
    api_key: ApiKey,
    model: String,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiGateway {
    pub fn new(
        http: reqwest::Client,
        api_key: ApiKey,
        model: &str,
        api_base: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            api_key,
            model: model.to_string(),
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            timeout,
        }
    }

    async fn request(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.0,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
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

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::NoContent)
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[tracing::instrument(name = "openai.generate", skip_all, fields(model = %self.model))]
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> String {
        match self.request(system_prompt, user_prompt).await {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(
                    %error,
                    kind = ErrorKind::Transport.as_str(),
                    "OpenAI API call failed"
                );
                String::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
