//! Environment-driven configuration.
//!
//! Every setting is read through a lookup function so that tests can supply a
//! map instead of mutating the process environment. `main` loads `.env` with
//! `dotenvy` before calling [`AppConfig::from_env`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use github::{GitHubSettings, GitHubToken};
use listener::settings::parse_actions;
use listener::{WebhookSecret, WebhookSettings};
use llm::{ApiKey, LlmBackend, LlmSettings};
use triage::{CriteriaText, TriageError};

pub const DEFAULT_APP_ENV: &str = "local";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_CRITERIA_PATH: &str = "TRIAGE_CRITERIA.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// OTLP collector endpoint; `None` disables span export.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_env: String,
    pub log: LogSettings,
    pub webhook: WebhookSettings,
    pub llm: LlmSettings,
    pub github: GitHubSettings,
    pub criteria_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, TriageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TriageError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let log = LogSettings {
            level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            format: match get("LOG_FORMAT") {
                Some(v) => parse_log_format(&v)?,
                None => LogFormat::default(),
            },
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        };

        let mut webhook = WebhookSettings::default();
        if let Some(port) = get("PORT") {
            webhook.port = port.parse().map_err(|_| {
                TriageError::configuration(format!("PORT must be a port number, got '{port}'"))
            })?;
        }
        webhook.secret = get("WEBHOOK_SECRET").and_then(WebhookSecret::new);
        if let Some(event) = get("ALLOWED_EVENT") {
            webhook.allowed_event = event;
        }
        if let Some(actions) = get("ALLOWED_ACTIONS") {
            webhook.allowed_actions = parse_actions(&actions);
        }

        let mut llm = LlmSettings::default();
        if let Some(backend) = get("LLM_BACKEND") {
            llm.backend = backend
                .parse::<LlmBackend>()
                .map_err(|e| TriageError::configuration(e.to_string()))?;
        }
        if let Some(force) = get("LLM_FORCE_STUB") {
            llm.force_stub = parse_bool("LLM_FORCE_STUB", &force)?;
        }
        llm.gemini.api_key = get("GEMINI_API_KEY").and_then(ApiKey::new);
        if let Some(model) = get("GEMINI_MODEL") {
            llm.gemini.model = model;
        }
        if let Some(base) = get("GEMINI_API_BASE") {
            llm.gemini.api_base = base;
        }
        llm.openai.api_key = get("OPENAI_API_KEY").and_then(ApiKey::new);
        if let Some(model) = get("OPENAI_MODEL") {
            llm.openai.model = model;
        }
        if let Some(base) = get("OPENAI_API_BASE") {
            llm.openai.api_base = base;
        }
        if let Some(secs) = get("LLM_TIMEOUT_SECONDS") {
            llm.timeout = parse_timeout("LLM_TIMEOUT_SECONDS", &secs)?;
        }

        let mut github = GitHubSettings::default();
        if let Some(dry_run) = get("DRY_RUN") {
            github.dry_run = parse_bool("DRY_RUN", &dry_run)?;
        }
        github.token = get("GITHUB_TOKEN").and_then(GitHubToken::new);
        if let Some(base) = get("GITHUB_API_BASE") {
            github.api_base = base;
        }

        Ok(Self {
            app_env: get("APP_ENV").unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            log,
            webhook,
            llm,
            github,
            criteria_path: PathBuf::from(
                get("TRIAGE_CRITERIA_PATH").unwrap_or_else(|| DEFAULT_CRITERIA_PATH.to_string()),
            ),
        })
    }
}

/// Reads the criteria document. It must exist and contain non-blank text.
pub fn load_criteria(path: &Path) -> Result<CriteriaText, TriageError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(TriageError::CriteriaMissing { path: display });
    }
    let text = std::fs::read_to_string(path).map_err(|source| TriageError::CriteriaUnreadable {
        path: display.clone(),
        source,
    })?;
    CriteriaText::new(text)
        .ok_or_else(|| TriageError::configuration(format!("criteria file {display} is empty")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, TriageError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(TriageError::configuration(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}

fn parse_timeout(key: &str, value: &str) -> Result<Duration, TriageError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| {
            TriageError::configuration(format!(
                "{key} must be a positive number of seconds, got '{value}'"
            ))
        })
}

fn parse_log_format(value: &str) -> Result<LogFormat, TriageError> {
    match value.to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "text" | "pretty" => Ok(LogFormat::Text),
        _ => Err(TriageError::configuration(format!(
            "LOG_FORMAT must be json or text, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, TriageError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.app_env, "local");
        assert_eq!(cfg.webhook.port, 8080);
        assert_eq!(cfg.webhook.secret, None);
        assert_eq!(cfg.webhook.allowed_event, "issues");
        assert_eq!(cfg.llm.backend, LlmBackend::Gemini);
        assert!(!cfg.llm.force_stub);
        assert_eq!(cfg.llm.timeout, Duration::from_secs(20));
        assert!(cfg.github.dry_run);
        assert!(cfg.github.token.is_none());
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert_eq!(cfg.criteria_path, PathBuf::from("TRIAGE_CRITERIA.md"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORT", "9000"),
            ("WEBHOOK_SECRET", "abc"),
            ("ALLOWED_ACTIONS", "opened"),
            ("LLM_BACKEND", "openai"),
            ("LLM_FORCE_STUB", "yes"),
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_TIMEOUT_SECONDS", "2.5"),
            ("DRY_RUN", "false"),
            ("GITHUB_TOKEN", "ghp_x"),
            ("LOG_FORMAT", "text"),
        ])
        .unwrap();
        assert_eq!(cfg.webhook.port, 9000);
        assert_eq!(cfg.webhook.secret.as_ref().unwrap().expose(), "abc");
        assert!(!cfg.webhook.is_allowed_action("edited"));
        assert_eq!(cfg.llm.backend, LlmBackend::OpenAi);
        assert!(cfg.llm.force_stub);
        assert_eq!(cfg.llm.openai.api_key.unwrap().expose(), "sk-test");
        assert_eq!(cfg.llm.timeout, Duration::from_millis(2500));
        assert!(!cfg.github.dry_run);
        assert_eq!(cfg.github.token.unwrap().expose(), "ghp_x");
        assert_eq!(cfg.log.format, LogFormat::Text);
    }

    #[test]
    fn test_blank_secret_disables_verification() {
        let cfg = config(&[("WEBHOOK_SECRET", "   ")]).unwrap();
        assert_eq!(cfg.webhook.secret, None);
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        for vars in [
            [("PORT", "http")],
            [("LLM_BACKEND", "claude")],
            [("DRY_RUN", "maybe")],
            [("LLM_TIMEOUT_SECONDS", "-1")],
            [("LOG_FORMAT", "xml")],
        ] {
            let err = config(&vars).unwrap_err();
            assert_eq!(err.kind(), triage::ErrorKind::Configuration, "{vars:?}");
        }
    }

    #[test]
    fn test_load_criteria() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Rule D: Insufficient Information").unwrap();
        let criteria = load_criteria(file.path()).unwrap();
        assert!(criteria.as_str().contains("Rule D"));
    }

    #[test]
    fn test_missing_criteria_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_criteria(&dir.path().join("TRIAGE_CRITERIA.md")).unwrap_err();
        assert!(matches!(err, TriageError::CriteriaMissing { .. }));
    }

    #[test]
    fn test_blank_criteria_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_criteria(file.path()).unwrap_err();
        assert!(matches!(err, TriageError::ConfigurationError { .. }));
    }
}
