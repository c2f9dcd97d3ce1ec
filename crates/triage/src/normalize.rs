//! Turns raw model text into canonical verdict fields.
//!
//! Structure problems (no JSON, or JSON that is not an object) are reported as
//! [`ParseError`]. Bad *values* never fail here: every field is coerced or
//! defaulted so that [`crate::validate`] sees a canonical shape.

use serde_json::{Map, Value};

use crate::errors::ParseError;
use crate::types::{is_priority_label, PRIORITY_LABEL_PREFIX};

const FENCE: &str = "```";

/// Reasoning used when the model omitted it.
pub const MISSING_REASONING: &str = "LLM output missing reasoning.";

/// Verdict fields after coercion, before invariant checks.
///
/// `priority` is still a string here; an unknown value is rejected later by
/// [`crate::validate::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFields {
    pub priority: String,
    pub action_required: bool,
    pub labels: Vec<String>,
    pub reasoning: String,
    pub confidence: f64,
    pub matched_rules: Vec<String>,
    pub missing_info_requests: Vec<String>,
}

/// Removes Markdown code-fence wrapping from model output.
///
/// A leading fence is stripped together with any trailing fence and an
/// optional `json` language tag; any other fence markers are then removed.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();
    if text.starts_with(FENCE) {
        text = text.trim_matches('`');
        if text
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            text = &text[4..];
        }
    }
    text.replace(FENCE, "").trim().to_string()
}

/// Parses and coerces raw model text into [`NormalizedFields`].
pub fn normalize(raw: &str) -> Result<NormalizedFields, ParseError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| ParseError::InvalidJson {
        message: e.to_string(),
    })?;
    let object = match value {
        Value::Object(map) => map,
        other => {
            return Err(ParseError::NotAnObject {
                found: json_type_name(&other),
            })
        }
    };

    Ok(normalize_object(&object))
}

fn normalize_object(data: &Map<String, Value>) -> NormalizedFields {
    let priority = match data.get("priority") {
        None => "LOW".to_string(),
        Some(Value::String(s)) => s.to_uppercase(),
        Some(other) => other.to_string().to_uppercase(),
    };

    // `notify_on_call` is the legacy spelling; `action_required` wins.
    let action_required = data
        .get("action_required")
        .or_else(|| data.get("notify_on_call"))
        .map(is_truthy)
        .unwrap_or(false);

    let confidence = data.get("confidence").map(coerce_f64).unwrap_or(0.0);

    let priority_label = format!("{PRIORITY_LABEL_PREFIX}{}", priority.to_lowercase());
    let mut labels = vec![priority_label];
    labels.extend(
        string_items(data.get("labels"))
            .into_iter()
            .filter(|label| !is_priority_label(label)),
    );

    let reasoning = match data.get("reasoning") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => MISSING_REASONING.to_string(),
    };

    NormalizedFields {
        priority,
        action_required,
        labels,
        reasoning,
        confidence,
        matched_rules: string_items(data.get("matched_rules")),
        missing_info_requests: string_items(data.get("missing_info_requests")),
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

fn string_items(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strip_fences_with_language_tag() {
        let raw = "```json\n{\"priority\":\"medium\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"priority\":\"medium\"}");
    }

    #[test]
    fn test_strip_fences_upper_case_tag_and_padding() {
        let raw = "  ```JSON\n{}\n```  ";
        assert_eq!(strip_code_fences(raw), "{}");
    }

    #[test]
    fn test_strip_fences_in_the_middle() {
        let raw = "Here you go:\n```\n{}\n```";
        assert_eq!(strip_code_fences(raw), "Here you go:\n\n{}");
    }

    #[test]
    fn test_plain_json_untouched() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_normalize_rejects_non_json() {
        assert!(matches!(
            normalize("not json"),
            Err(ParseError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(normalize("   "), Err(ParseError::Empty));
        assert_eq!(normalize("``````"), Err(ParseError::Empty));
    }

    #[test]
    fn test_normalize_rejects_non_object() {
        assert_eq!(
            normalize("[1, 2]"),
            Err(ParseError::NotAnObject { found: "array" })
        );
    }

    #[test]
    fn test_normalize_defaults_everything() {
        let fields = normalize("{}").unwrap();
        assert_eq!(
            fields,
            NormalizedFields {
                priority: "LOW".to_string(),
                action_required: false,
                labels: vec!["priority:low".to_string()],
                reasoning: MISSING_REASONING.to_string(),
                confidence: 0.0,
                matched_rules: Vec::new(),
                missing_info_requests: Vec::new(),
            }
        );
    }

    #[test]
    fn test_normalize_fenced_medium() {
        let raw = "```json\n{\"priority\":\"medium\",\"action_required\":false,\"reasoning\":\"Staging only.\",\"confidence\":0.8}\n```";
        let fields = normalize(raw).unwrap();
        assert_eq!(fields.priority, "MEDIUM");
        assert_eq!(fields.labels, vec!["priority:medium".to_string()]);
    }

    #[test]
    fn test_labels_replace_stale_priority_labels() {
        let raw = r#"{"priority":"high","labels":["Priority:Low","bug",7,"priority:high","infra"]}"#;
        let fields = normalize(raw).unwrap();
        assert_eq!(fields.labels, vec!["priority:high", "bug", "infra"]);
    }

    #[test]
    fn test_labels_not_a_list() {
        let fields = normalize(r#"{"priority":"LOW","labels":"bug"}"#).unwrap();
        assert_eq!(fields.labels, vec!["priority:low"]);
    }

    #[test]
    fn test_action_required_precedence_over_alias() {
        let fields = normalize(r#"{"action_required":false,"notify_on_call":true}"#).unwrap();
        assert!(!fields.action_required);

        let fields = normalize(r#"{"notify_on_call":true}"#).unwrap();
        assert!(fields.action_required);
    }

    #[test]
    fn test_action_required_truthiness() {
        assert!(normalize(r#"{"action_required":"yes"}"#).unwrap().action_required);
        assert!(normalize(r#"{"action_required":1}"#).unwrap().action_required);
        assert!(!normalize(r#"{"action_required":0}"#).unwrap().action_required);
        assert!(!normalize(r#"{"action_required":null}"#).unwrap().action_required);
    }

    #[test]
    fn test_confidence_coercion() {
        assert_eq!(normalize(r#"{"confidence":"0.75"}"#).unwrap().confidence, 0.75);
        assert_eq!(normalize(r#"{"confidence":"high"}"#).unwrap().confidence, 0.0);
        assert_eq!(normalize(r#"{"confidence":[0.5]}"#).unwrap().confidence, 0.0);
        assert_eq!(normalize(r#"{"confidence":true}"#).unwrap().confidence, 1.0);
    }

    #[test]
    fn test_non_string_priority_is_stringified() {
        assert_eq!(normalize(r#"{"priority":3}"#).unwrap().priority, "3");
    }

    #[test]
    fn test_reasoning_and_lists_defaulted_on_wrong_type() {
        let fields =
            normalize(r#"{"reasoning":"","matched_rules":"Rule A","missing_info_requests":null}"#)
                .unwrap();
        assert_eq!(fields.reasoning, MISSING_REASONING);
        assert!(fields.matched_rules.is_empty());
        assert!(fields.missing_info_requests.is_empty());
    }
}
