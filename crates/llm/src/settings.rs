//! Backend configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::errors::LlmError;

/// Default request timeout for remote backends.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Which backend the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    Gemini,
    OpenAi,
    Stub,
}

impl FromStr for LlmBackend {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmBackend::Gemini),
            "openai" | "chatgpt" => Ok(LlmBackend::OpenAi),
            "stub" | "mock" => Ok(LlmBackend::Stub),
            other => Err(LlmError::UnknownBackend {
                name: other.to_string(),
            }),
        }
    }
}

/// A provider API key. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, returning `None` if it is blank.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Connection settings for one remote provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub api_base: String,
}

/// Everything needed to pick and build a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub backend: LlmBackend,
    /// Use the keyword stub regardless of `backend` and keys.
    pub force_stub: bool,
    pub gemini: ProviderSettings,
    pub openai: ProviderSettings,
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            force_stub: false,
            gemini: ProviderSettings {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            },
            openai: ProviderSettings {
                api_key: None,
                model: DEFAULT_OPENAI_MODEL.to_string(),
                api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            },
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("Gemini".parse::<LlmBackend>().unwrap(), LlmBackend::Gemini);
        assert_eq!(" openai ".parse::<LlmBackend>().unwrap(), LlmBackend::OpenAi);
        assert_eq!("mock".parse::<LlmBackend>().unwrap(), LlmBackend::Stub);
        assert!(matches!(
            "claude".parse::<LlmBackend>(),
            Err(LlmError::UnknownBackend { .. })
        ));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert!(ApiKey::new("  ").is_none());
    }
}
