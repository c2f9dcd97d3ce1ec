//! The subset of the GitHub `issues` webhook payload the receiver reads.

use serde::Deserialize;
use serde_json::{json, Value};

/// An `issues` event. Every field is optional so that a missing field is
/// reported as a 400 rather than a deserialisation failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuesEvent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub issue: Option<Issue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Builds an `issues` payload for demos and tests.
pub fn sample_issue_payload(
    title: &str,
    body: &str,
    repo: &str,
    action: &str,
    issue_number: u64,
) -> Value {
    json!({
        "action": action,
        "repository": { "full_name": repo },
        "issue": {
            "number": issue_number,
            "title": title,
            "body": body,
            "html_url": format!("https://github.com/{repo}/issues/{issue_number}"),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_payload_deserialises() {
        let payload = sample_issue_payload("t", "b", "demo/example", "opened", 1);
        let event: IssuesEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.action.as_deref(), Some("opened"));
        let issue = event.issue.unwrap();
        assert_eq!(issue.number, Some(1));
        assert_eq!(
            issue.html_url.as_deref(),
            Some("https://github.com/demo/example/issues/1")
        );
    }

    #[test]
    fn test_null_body_is_none() {
        let event: IssuesEvent =
            serde_json::from_str(r#"{"action":"opened","issue":{"number":2,"title":"t","body":null}}"#)
                .unwrap();
        assert!(event.repository.is_none());
        assert!(event.issue.unwrap().body.is_none());
    }
}
