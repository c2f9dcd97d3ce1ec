//! Converts normalised fields into a validated [`TriageResult`].

use crate::errors::ValidationError;
use crate::normalize::NormalizedFields;
use crate::types::Priority;
use crate::verdict::{TriageResult, VerdictParts};

/// Builds a [`TriageResult`] from normalised fields.
///
/// Fails with a [`ValidationError`] (kind
/// [`SchemaViolation`](crate::ErrorKind::SchemaViolation)) when the priority is
/// unknown or any verdict invariant does not hold.
pub fn validate(fields: NormalizedFields) -> Result<TriageResult, ValidationError> {
    let priority = Priority::from_wire(&fields.priority).ok_or_else(|| {
        ValidationError::UnknownPriority {
            value: fields.priority.clone(),
        }
    })?;

    TriageResult::new(VerdictParts {
        priority,
        action_required: fields.action_required,
        labels: fields.labels,
        reasoning: fields.reasoning,
        confidence: fields.confidence,
        matched_rules: fields.matched_rules,
        missing_info_requests: fields.missing_info_requests,
    })
}
