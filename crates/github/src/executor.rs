//! Turns a verdict into GitHub actions.

use serde::Serialize;
use serde_json::Value;
use triage::{render_comment, IssueNumber, RepositoryName, TriageResult};

use crate::client::GitHubClient;
use crate::errors::GitHubError;
use crate::settings::GitHubSettings;

/// Coordinates of the issue being triaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub repo: RepositoryName,
    pub number: IssueNumber,
    pub url: String,
}

/// What happened (or would happen) to the on-call notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Notification {
    /// Dry run, action required.
    On,
    /// Dry run, no action required.
    Off,
    /// Live, action required.
    Sent,
    /// Live, no action required.
    Skipped,
}

/// One action a dry run would have taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
    AddLabel {
        label: String,
        issue: IssueNumber,
        repo: RepositoryName,
    },
    Comment {
        body: String,
    },
}

/// Outcome of [`ActionExecutor::execute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ActionReport {
    DryRun {
        planned: Vec<PlannedAction>,
        notification: Notification,
    },
    Live {
        applied_label: Value,
        comment: Value,
        notification: Notification,
    },
}

/// Applies verdicts to GitHub, or reports them in dry-run mode.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    settings: GitHubSettings,
    http: reqwest::Client,
}

impl ActionExecutor {
    pub fn new(settings: GitHubSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    pub fn is_dry_run(&self) -> bool {
        self.settings.dry_run
    }

    /// Labels and comments on `issue` according to `result`.
    ///
    /// Fails with [`GitHubError::MissingToken`] in live mode without a token,
    /// and with a transport or API error if either GitHub call fails.
    pub async fn execute(
        &self,
        result: &TriageResult,
        issue: &IssueRef,
    ) -> Result<ActionReport, GitHubError> {
        let comment_body = render_comment(result, &issue.url);
        let label = result.priority().label();

        if self.settings.dry_run {
            tracing::info!("DRY_RUN enabled; skipping GitHub API calls");
            return Ok(ActionReport::DryRun {
                planned: vec![
                    PlannedAction::AddLabel {
                        label,
                        issue: issue.number,
                        repo: issue.repo.clone(),
                    },
                    PlannedAction::Comment { body: comment_body },
                ],
                notification: if result.action_required() {
                    Notification::On
                } else {
                    Notification::Off
                },
            });
        }

        let token = self
            .settings
            .token
            .clone()
            .ok_or(GitHubError::MissingToken)?;
        let client = GitHubClient::new(
            self.http.clone(),
            token,
            &self.settings.api_base,
            self.settings.timeout,
        );

        let applied_label = client.add_label(&issue.repo, issue.number, &label).await?;
        let comment = client
            .add_comment(&issue.repo, issue.number, &comment_body)
            .await?;

        let notification = if result.action_required() {
            tracing::info!(repo = %issue.repo, issue = %issue.number, "Action required: would notify on-call");
            Notification::Sent
        } else {
            Notification::Skipped
        };

        Ok(ActionReport::Live {
            applied_label,
            comment,
            notification,
        })
    }
}
