use std::time::Duration;

use llm::{ApiKey, GeminiGateway, OpenAiGateway};
use pretty_assertions::assert_eq;
use serde_json::json;
use triage::LlmGateway;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VERDICT: &str = r#"{"priority":"HIGH","action_required":true}"#;

fn key() -> ApiKey {
    ApiKey::new("test-key").unwrap()
}

fn gemini(server: &MockServer, timeout: Duration) -> GeminiGateway {
    GeminiGateway::new(
        reqwest::Client::new(),
        key(),
        "gemini-1.5-flash",
        &server.uri(),
        timeout,
    )
}

fn openai(server: &MockServer, timeout: Duration) -> OpenAiGateway {
    OpenAiGateway::new(
        reqwest::Client::new(),
        key(),
        "gpt-4o-mini",
        &format!("{}/v1/", server.uri()),
        timeout,
    )
}

#[tokio::test]
async fn test_gemini_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "system"}]},
            "contents": [{"role": "user", "parts": [{"text": "user"}]}],
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": format!("  {VERDICT}\n")}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini(&server, Duration::from_secs(5))
        .generate("system", "user")
        .await;
    assert_eq!(text, VERDICT);
}

#[tokio::test]
async fn test_gemini_error_status_yields_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let text = gemini(&server, Duration::from_secs(5))
        .generate("system", "user")
        .await;
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_gemini_timeout_yields_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let text = gemini(&server, Duration::from_millis(50))
        .generate("system", "user")
        .await;
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_openai_returns_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "system"},
                {"role": "user", "content": "user"}
            ],
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": VERDICT}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = openai(&server, Duration::from_secs(5))
        .generate("system", "user")
        .await;
    assert_eq!(text, VERDICT);
}

#[tokio::test]
async fn test_openai_missing_content_yields_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&server)
        .await;

    let text = openai(&server, Duration::from_secs(5))
        .generate("system", "user")
        .await;
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_openai_unreachable_yields_empty_text() {
    let server = MockServer::start().await;
    let gateway = openai(&server, Duration::from_secs(1));
    drop(server);

    assert_eq!(gateway.generate("system", "user").await, "");
}
