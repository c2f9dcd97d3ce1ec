//! GitHub adapter configuration.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// A GitHub token. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubToken(String);

impl GitHubToken {
    /// Wraps a token, returning `None` if it is blank.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GitHubToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    /// Report planned actions instead of calling the API.
    pub dry_run: bool,
    pub token: Option<GitHubToken>,
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            dry_run: true,
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
