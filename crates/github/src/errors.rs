//! GitHub adapter errors.

use thiserror::Error;
use triage::ErrorKind;

#[derive(Debug, Error)]
pub enum GitHubError {
    /// Live mode was requested without a token.
    #[error("GITHUB_TOKEN is required when DRY_RUN is false")]
    MissingToken,

    /// The request could not be sent or timed out.
    #[error("GitHub transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// GitHub answered with a non-success status.
    #[error("GitHub API returned HTTP {status} for {endpoint}: {body}")]
    Api {
        /// Path of the failed call.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },
}

impl GitHubError {
    /// [`ErrorKind::Configuration`] for a missing token, otherwise
    /// [`ErrorKind::Transport`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            GitHubError::MissingToken => ErrorKind::Configuration,
            GitHubError::Transport(_) | GitHubError::Api { .. } => ErrorKind::Transport,
        }
    }
}
