//! Error types for the triage domain.
//!
//! [`ParseError`] and [`ValidationError`] describe unusable model output. The
//! pipeline absorbs both into the fallback verdict; they never reach the
//! webhook caller. [`TriageError`] covers operator misconfiguration, which
//! must fail loudly instead.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Coarse classification of a failure, used for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The LLM call itself failed (absorbed inside the gateway adapters).
    Transport,
    /// Model output was not a JSON object.
    Parse,
    /// Model output parsed but broke a verdict invariant.
    SchemaViolation,
    /// The service is misconfigured.
    Configuration,
}

impl ErrorKind {
    /// Returns a stable snake_case name for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Parse => "parse",
            ErrorKind::SchemaViolation => "schema_violation",
            ErrorKind::Configuration => "configuration",
        }
    }
}

// ---------------------------------------------------------------------------
// Model output errors
// ---------------------------------------------------------------------------

/// Raw model text could not be turned into a JSON object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Nothing was left after trimming and fence removal.
    #[error("LLM output is empty")]
    Empty,

    /// The text is not valid JSON.
    #[error("LLM output is not valid JSON: {message}")]
    InvalidJson {
        /// Parser diagnostic.
        message: String,
    },

    /// The text is valid JSON but not an object.
    #[error("LLM output is a JSON {found}, expected an object")]
    NotAnObject {
        /// JSON type that was found instead (`"array"`, `"string"`, ...).
        found: &'static str,
    },
}

impl ParseError {
    /// Always [`ErrorKind::Parse`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Parse
    }
}

/// Normalised fields broke one of the [`crate::TriageResult`] invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Priority is not one of `HIGH`, `MEDIUM`, `LOW`.
    #[error("unknown priority '{value}'")]
    UnknownPriority {
        /// The offending priority string.
        value: String,
    },

    /// Confidence is outside `[0.0, 1.0]` or not finite.
    #[error("confidence {value} is outside [0.0, 1.0]")]
    ConfidenceOutOfRange {
        /// The offending confidence value.
        value: f64,
    },

    /// Reasoning is empty or whitespace-only.
    #[error("reasoning must be non-empty")]
    EmptyReasoning,

    /// No label matches the verdict priority.
    #[error("labels must include '{expected}'")]
    MissingPriorityLabel {
        /// The label that was expected.
        expected: String,
    },

    /// The matching priority label appears more than once.
    #[error("labels must include exactly one '{expected}', found {count}")]
    DuplicatePriorityLabel {
        /// The label that was expected.
        expected: String,
        /// How many times it appeared.
        count: usize,
    },

    /// A priority label that disagrees with the verdict priority is present.
    #[error("label '{found}' does not match priority label '{expected}'")]
    MismatchedPriorityLabel {
        /// The label that was expected.
        expected: String,
        /// The conflicting label.
        found: String,
    },
}

impl ValidationError {
    /// Always [`ErrorKind::SchemaViolation`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SchemaViolation
    }
}

// ---------------------------------------------------------------------------
// Operator errors
// ---------------------------------------------------------------------------

/// Conditions caused by operator misconfiguration rather than model output.
#[derive(Debug, Error)]
pub enum TriageError {
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The criteria file does not exist or is empty.
    #[error("Triage criteria not found or empty at '{path}'")]
    CriteriaMissing {
        /// Path that was searched.
        path: String,
    },

    /// The criteria file exists but could not be read.
    #[error("Triage criteria at '{path}' could not be read")]
    CriteriaUnreadable {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl TriageError {
    /// Shorthand for [`TriageError::ConfigurationError`].
    pub fn configuration(message: impl Into<String>) -> Self {
        TriageError::ConfigurationError {
            message: message.into(),
        }
    }

    /// Always [`ErrorKind::Configuration`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}
