//! Prompt construction.

use crate::types::CriteriaText;

/// Prefixes of the four labelled lines in the user prompt.
pub const TITLE_FIELD: &str = "Issue Title:";
pub const BODY_FIELD: &str = "Issue Body:";
pub const REPOSITORY_FIELD: &str = "Repository:";
pub const URL_FIELD: &str = "Issue URL:";

const UNKNOWN: &str = "unknown";

const OUTPUT_CONTRACT: &str = r#"Return your answer strictly as JSON with no markdown or extra commentary.
The JSON must match this schema exactly:
{
  "priority": "HIGH|MEDIUM|LOW",
  "action_required": true/false,
  "labels": ["priority:high|medium|low"],
  "reasoning": "short rationale",
  "confidence": 0.0-1.0,
  "matched_rules": ["rules or heuristics applied"],
  "missing_info_requests": ["questions for the reporter, if information is missing"]
}
Example:
{
  "priority": "HIGH",
  "action_required": true,
  "labels": ["priority:high"],
  "reasoning": "Production outage impacting customers.",
  "confidence": 0.91,
  "matched_rules": ["HIGH: Production impact"],
  "missing_info_requests": []
}"#;

/// System and user prompt for one triage request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Renders the prompts for one issue.
///
/// The system prompt embeds `criteria` verbatim followed by the JSON output
/// contract. The user prompt has one labelled line per field; a missing body
/// renders empty and a missing repository or URL renders as `unknown`.
pub fn build_prompts(
    criteria: &CriteriaText,
    title: &str,
    body: Option<&str>,
    repo: Option<&str>,
    url: Option<&str>,
) -> PromptPair {
    let system = format!(
        "You are the 'issue-triager' bot, a DevOps triage expert.\n\
         Triaging Rules:\n\
         {criteria}\n\n\
         {OUTPUT_CONTRACT}",
        criteria = criteria.as_str(),
    );

    let user = format!(
        "{TITLE_FIELD} {title}\n\
         {BODY_FIELD} {body}\n\
         {REPOSITORY_FIELD} {repo}\n\
         {URL_FIELD} {url}",
        body = body.unwrap_or_default(),
        repo = repo.filter(|r| !r.is_empty()).unwrap_or(UNKNOWN),
        url = url.filter(|u| !u.is_empty()).unwrap_or(UNKNOWN),
    );

    PromptPair { system, user }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn criteria() -> CriteriaText {
        CriteriaText::new("Rule A: Silent Crisis\nRule D: Insufficient Information\n").unwrap()
    }

    #[test]
    fn test_system_prompt_embeds_criteria_and_contract() {
        let prompts = build_prompts(&criteria(), "t", None, None, None);
        assert!(prompts
            .system
            .contains("Rule A: Silent Crisis\nRule D: Insufficient Information"));
        assert!(prompts.system.contains("\"priority\": \"HIGH|MEDIUM|LOW\""));
        assert!(prompts.system.contains("Example:"));
    }

    #[test]
    fn test_criteria_trailing_whitespace_is_kept() {
        let text = "Rule A: Silent Crisis\n\n  \n";
        let criteria = CriteriaText::new(text).unwrap();
        let prompts = build_prompts(&criteria, "t", None, None, None);
        assert!(prompts
            .system
            .contains(&format!("Triaging Rules:\n{text}\n\nReturn your answer")));
    }

    #[test]
    fn test_user_prompt_defaults() {
        let prompts = build_prompts(&criteria(), "Help", None, None, Some(""));
        assert_eq!(
            prompts.user,
            "Issue Title: Help\nIssue Body: \nRepository: unknown\nIssue URL: unknown"
        );
    }

    #[test]
    fn test_user_prompt_all_fields() {
        let prompts = build_prompts(
            &criteria(),
            "Staging pipeline failing",
            Some("Terraform apply failing in staging."),
            Some("demo/repo"),
            Some("https://github.com/demo/repo/issues/1"),
        );
        assert_eq!(
            prompts.user,
            "Issue Title: Staging pipeline failing\n\
             Issue Body: Terraform apply failing in staging.\n\
             Repository: demo/repo\n\
             Issue URL: https://github.com/demo/repo/issues/1"
        );
    }
}
