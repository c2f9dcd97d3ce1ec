//! Sends a sample signed `issues` delivery to a running receiver.

use std::path::Path;
use std::time::Duration;

use listener::{sample_issue_payload, sign, WebhookSecret, SIGNATURE_HEADER};
use serde_json::Value;

use crate::eval::{load_dataset, GoldenCase};

pub const DEMO_REPO: &str = "demo/example";
pub const DEMO_TIMEOUT: Duration = Duration::from_secs(30);
const DEMO_TITLE: &str = "Sample issue from webhook simulation";
const DEMO_BODY: &str = "Testing the issue triager webhook locally.";

/// Picks `case_id` from the dataset, or the first case when it is absent or
/// unknown. Returns `None` if the dataset cannot be read or is empty.
pub fn pick_case(dataset: &Path, case_id: Option<&str>) -> Option<GoldenCase> {
    let cases = match load_dataset(dataset) {
        Ok(cases) => cases,
        Err(error) => {
            tracing::warn!(error = %error, "Falling back to the basic demo payload");
            return None;
        }
    };

    if let Some(id) = case_id {
        if let Some(case) = cases.iter().find(|c| c.id == id) {
            return Some(case.clone());
        }
        tracing::warn!(case_id = id, "Case not found; using the first dataset case");
    }
    cases.into_iter().next()
}

pub fn build_payload(case: Option<&GoldenCase>) -> Value {
    let (title, body) = match case {
        Some(c) => (c.title.as_str(), c.description.as_str()),
        None => (DEMO_TITLE, DEMO_BODY),
    };
    sample_issue_payload(title, body, DEMO_REPO, "opened", 1)
}

/// Posts `payload` to `url`, signing it when `secret` is set. Returns the
/// response status and body text.
pub async fn send(
    http: &reqwest::Client,
    url: &str,
    payload: &Value,
    secret: Option<&WebhookSecret>,
) -> anyhow::Result<(u16, String)> {
    let body = serde_json::to_vec(payload)?;

    let mut request = http
        .post(url)
        .timeout(DEMO_TIMEOUT)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .header("X-GitHub-Event", "issues");
    if let Some(secret) = secret {
        request = request.header(SIGNATURE_HEADER, sign(&body, secret.expose()));
    }

    tracing::info!(url, "Sending sample webhook");
    let response = request.body(body).send().await?;
    let status = response.status().as_u16();
    Ok((status, response.text().await?))
}
