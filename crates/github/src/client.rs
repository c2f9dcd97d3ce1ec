//! Minimal GitHub REST client: add a label, post a comment.

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::{json, Value};
use triage::{IssueNumber, RepositoryName};

use crate::errors::GitHubError;
use crate::settings::GitHubToken;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = concat!("issue-triager/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: GitHubToken,
    api_base: String,
    timeout: Duration,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, token: GitHubToken, api_base: &str, timeout: Duration) -> Self {
        Self {
            http,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Adds `label` to the issue. Returns GitHub's response body.
    #[tracing::instrument(skip_all, fields(repo = %repo, issue = %issue, label = %label))]
    pub async fn add_label(
        &self,
        repo: &RepositoryName,
        issue: IssueNumber,
        label: &str,
    ) -> Result<Value, GitHubError> {
        let endpoint = format!("/repos/{repo}/issues/{issue}/labels");
        let response = self.post(&endpoint, &json!({ "labels": [label] })).await?;
        tracing::info!("Applied label");
        Ok(response)
    }

    /// Posts `body` as a comment on the issue. Returns GitHub's response body.
    #[tracing::instrument(skip_all, fields(repo = %repo, issue = %issue))]
    pub async fn add_comment(
        &self,
        repo: &RepositoryName,
        issue: IssueNumber,
        body: &str,
    ) -> Result<Value, GitHubError> {
        let endpoint = format!("/repos/{repo}/issues/{issue}/comments");
        let response = self.post(&endpoint, &json!({ "body": body })).await?;
        tracing::info!("Posted comment");
        Ok(response)
    }

    async fn post(&self, endpoint: &str, payload: &Value) -> Result<Value, GitHubError> {
        let response = self
            .http
            .post(format!("{}{endpoint}", self.api_base))
            .bearer_auth(self.token.expose())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(API_VERSION_HEADER, API_VERSION)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}
