//! Webhook receiver configuration.

use std::collections::BTreeSet;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALLOWED_EVENT: &str = "issues";
pub const DEFAULT_ALLOWED_ACTIONS: &str = "opened,edited";

/// Shared secret for `X-Hub-Signature-256`. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wraps a secret, returning `None` if it is empty. An empty secret means
    /// verification is disabled.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSettings {
    pub port: u16,
    /// `None` disables signature verification.
    pub secret: Option<WebhookSecret>,
    /// Accepted `X-GitHub-Event` value.
    pub allowed_event: String,
    /// Accepted payload `action` values.
    pub allowed_actions: BTreeSet<String>,
}

impl WebhookSettings {
    pub fn is_allowed_action(&self, action: &str) -> bool {
        self.allowed_actions.contains(action)
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            secret: None,
            allowed_event: DEFAULT_ALLOWED_EVENT.to_string(),
            allowed_actions: parse_actions(DEFAULT_ALLOWED_ACTIONS),
        }
    }
}

/// Splits a comma-separated action list, dropping blanks.
pub fn parse_actions(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
