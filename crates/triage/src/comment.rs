//! Markdown comment posted back to the triaged issue.

use crate::verdict::TriageResult;

/// Renders the triage comment for `result`.
pub fn render_comment(result: &TriageResult, issue_url: &str) -> String {
    let missing_info = if result.missing_info_requests().is_empty() {
        "None.".to_string()
    } else {
        result
            .missing_info_requests()
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let matched_rules = if result.matched_rules().is_empty() {
        "None".to_string()
    } else {
        result.matched_rules().join(", ")
    };

    format!(
        "Automated triage result:\n\
         - Priority: {priority}\n\
         - Confidence: {confidence:?}\n\
         - Reasoning: {reasoning}\n\
         - Matched rules: {matched_rules}\n\
         - Missing info requests:\n{missing_info}\n\
         - Issue: {issue_url}",
        priority = result.priority(),
        confidence = result.confidence().as_f64(),
        reasoning = result.reasoning(),
    )
}
