//! Deterministic keyword backend.
//!
//! Reads the issue fields back out of the user prompt and applies fixed
//! keyword rules that mirror `TRIAGE_CRITERIA.md`. Always answers with JSON in
//! the verdict schema. The keyword lists are illustrative tuning, not a
//! contract.

use async_trait::async_trait;
use serde_json::json;
use triage::guard::is_vague;
use triage::prompt::{BODY_FIELD, REPOSITORY_FIELD, TITLE_FIELD, URL_FIELD};
use triage::{LlmGateway, Priority, GENERIC_MISSING_INFO_REQUEST, INSUFFICIENT_INFO_RULE};

const RULE_CRITICAL_INFRA: &str = "Rule C: Critical Infrastructure Protection";
const RULE_SILENT_CRISIS: &str = "Rule A: Silent Crisis";
const RULE_LOUD_USER: &str = "Rule B: Loud User";
const RULE_SECURITY: &str = "HIGH: Security vulnerability";
const RULE_PRODUCTION: &str = "HIGH: Production impact";
const RULE_NON_PROD: &str = "MEDIUM: Non-prod pipeline or staging";
const RULE_DOCS: &str = "LOW: Documentation";
const RULE_SANDBOX: &str = "LOW: Sandbox";

const CRITICAL_INFRA: &[&str] = &["shared-vpc-01", "root-dns-zone", "global-iam-policy"];
const WIDESPREAD: &[&str] = &[
    "nobody",
    "everyone",
    "entire office",
    "widespread",
    "whole company",
];
const SECURITY: &[&str] = &[
    "security",
    "vulnerability",
    "publicly accessible",
    "public access",
    "leak",
    "exposed",
];
const PRODUCTION: &[&str] = &["production", "prod "];
const OUTAGE: &[&str] = &[
    "outage",
    "down",
    "timeout",
    "504",
    "502",
    "503",
    "unable",
    "impact",
    "customers",
    "revenue loss",
    "latency",
    "gateway",
];
const NON_PROD_ENV: &[&str] = &["staging", "uat", "dev-cluster", "dev ", "qa", "non-prod"];
const DOCS: &[&str] = &["doc", "wiki", "onboarding"];

/// Keyword-rule backend used without live credentials and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordStub;

#[async_trait]
impl LlmGateway for KeywordStub {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, _system_prompt: &str, user_prompt: &str) -> String {
        classify(user_prompt).to_string()
    }
}

/// Applies the keyword rules to a rendered user prompt.
pub fn classify(user_prompt: &str) -> serde_json::Value {
    let title = extract_field(user_prompt, TITLE_FIELD);
    let body = extract_body(user_prompt);
    let repo = extract_last_field(user_prompt, REPOSITORY_FIELD);
    let url = extract_last_field(user_prompt, URL_FIELD);
    let text = format!("{title}\n{body}\n{repo}\n{url}").to_lowercase();

    let loud_user = is_shouting(&body) || user_prompt.matches('!').count() >= 3;

    let mut priority = Priority::Low;
    let mut matched_rules: Vec<&str> = Vec::new();
    let mut missing_info_requests: Vec<&str> = Vec::new();
    let mut action_required = false;
    let confidence: f64;
    let reasoning;

    if is_vague(&title, Some(&body)) {
        matched_rules.push(INSUFFICIENT_INFO_RULE);
        missing_info_requests.push(GENERIC_MISSING_INFO_REQUEST);
        reasoning = "Issue too vague; requesting more details.";
        confidence = 0.2;
    } else {
        let mut high_reason = None;
        if mentions_any(&text, CRITICAL_INFRA) {
            matched_rules.push(RULE_CRITICAL_INFRA);
            high_reason = Some("Mentions critical shared infrastructure.");
        }
        if mentions_any(&text, WIDESPREAD) {
            matched_rules.push(RULE_SILENT_CRISIS);
            high_reason = Some("Describes widespread impact.");
        }
        if mentions_any(&text, SECURITY) || text.contains("block public access") {
            matched_rules.push(RULE_SECURITY);
            high_reason = Some("Security exposure detected.");
        }
        if is_production_outage(&text) {
            matched_rules.push(RULE_PRODUCTION);
            high_reason = Some("Production outage or customer impact described.");
        }

        if let Some(reason) = high_reason {
            priority = Priority::High;
            action_required = true;
            confidence = 0.92;
            reasoning = reason;
        } else if is_non_prod_pipeline(&text) {
            priority = Priority::Medium;
            matched_rules.push(RULE_NON_PROD);
            reasoning = "Non-production environment pipeline issue.";
            confidence = 0.82;
        } else if mentions_any(&text, DOCS) {
            matched_rules.push(RULE_DOCS);
            reasoning = "Documentation or internal wiki update.";
            confidence = 0.78;
        } else if text.contains("sandbox") {
            matched_rules.push(RULE_SANDBOX);
            reasoning = "Sandbox environment issue.";
            confidence = 0.76;
        } else {
            reasoning = "No high/medium indicators found; defaulting to LOW.";
            confidence = 0.7;
        }
    }

    if text.contains("sandbox") && loud_user && !matched_rules.contains(&RULE_LOUD_USER) {
        matched_rules.push(RULE_LOUD_USER);
    }

    json!({
        "priority": priority.as_str(),
        "action_required": action_required,
        "labels": [priority.label()],
        "reasoning": reasoning,
        "confidence": confidence,
        "missing_info_requests": missing_info_requests,
        "matched_rules": matched_rules,
    })
}

fn extract_field(user_prompt: &str, prefix: &str) -> String {
    user_prompt
        .lines()
        .find_map(|line| line.trim().strip_prefix(prefix))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Matches the last line with `prefix`; the body may repeat a label.
fn extract_last_field(user_prompt: &str, prefix: &str) -> String {
    user_prompt
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(prefix))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Everything between the body label and the last repository line.
fn extract_body(user_prompt: &str) -> String {
    let Some((_, rest)) = user_prompt.split_once(BODY_FIELD) else {
        return String::new();
    };
    let body = match rest.rfind(&format!("\n{REPOSITORY_FIELD}")) {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim().to_string()
}

fn mentions_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

fn is_production_outage(text: &str) -> bool {
    mentions_any(text, PRODUCTION)
        && !text.contains("not blocking production")
        && mentions_any(text, OUTAGE)
}

fn is_non_prod_pipeline(text: &str) -> bool {
    mentions_any(text, NON_PROD_ENV) || (text.contains("terraform") && !text.contains("production"))
}

/// All cased characters are upper case, and there is at least one.
fn is_shouting(body: &str) -> bool {
    body.chars().any(char::is_uppercase) && !body.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use triage::{build_prompts, CriteriaText};

    use super::*;

    fn run(title: &str, body: &str) -> serde_json::Value {
        let criteria = CriteriaText::new("rules").unwrap();
        let prompts = build_prompts(&criteria, title, Some(body), None, None);
        classify(&prompts.user)
    }

    #[test]
    fn test_extract_field() {
        let prompt = "Issue Title: Help\nIssue Body: \nRepository: unknown";
        assert_eq!(extract_field(prompt, TITLE_FIELD), "Help");
        assert_eq!(extract_body(prompt), "");
        assert_eq!(extract_last_field(prompt, URL_FIELD), "");
    }

    #[test]
    fn test_extract_body_spans_lines() {
        let criteria = CriteriaText::new("rules").unwrap();
        let body = "First line.\n\nRepository: mentioned in the body\n- step two";
        let prompts = build_prompts(&criteria, "t", Some(body), Some("o/r"), Some("u"));
        assert_eq!(extract_body(&prompts.user), body);
        assert_eq!(extract_last_field(&prompts.user, REPOSITORY_FIELD), "o/r");
        assert_eq!(extract_last_field(&prompts.user, URL_FIELD), "u");
    }

    #[test]
    fn test_multi_line_production_outage_is_high() {
        let out = run(
            "Checkout down",
            "Customers cannot check out.\n\
             Production API returns 503 for every request since 09:00 UTC.\n\
             Revenue impact is significant.",
        );
        assert_eq!(out["priority"], "HIGH");
        assert_eq!(out["matched_rules"], json!([RULE_PRODUCTION]));
        assert_eq!(out["missing_info_requests"], json!([]));
    }

    #[test]
    fn test_production_outage_is_high() {
        let out = run(
            "Production DB outage",
            "Customers seeing 503s on checkout, revenue impact, prod down",
        );
        assert_eq!(out["priority"], "HIGH");
        assert_eq!(out["action_required"], true);
        assert_eq!(out["labels"], json!(["priority:high"]));
        assert_eq!(out["matched_rules"], json!([RULE_PRODUCTION]));
    }

    #[test]
    fn test_vague_is_low_with_rule_d() {
        let out = run("Help", "Broken");
        assert_eq!(out["priority"], "LOW");
        assert_eq!(out["confidence"], 0.2);
        assert_eq!(out["matched_rules"], json!([INSUFFICIENT_INFO_RULE]));
    }

    #[test]
    fn test_staging_pipeline_is_medium() {
        let out = run(
            "Staging pipeline failing",
            "Terraform apply failing in staging environment since this morning's merge.",
        );
        assert_eq!(out["priority"], "MEDIUM");
        assert_eq!(out["matched_rules"], json!([RULE_NON_PROD]));
    }

    #[test]
    fn test_critical_infra_is_high() {
        let out = run(
            "Change request",
            "Please review the route table change on shared-vpc-01 before Friday's window.",
        );
        assert_eq!(out["priority"], "HIGH");
        assert_eq!(out["matched_rules"], json!([RULE_CRITICAL_INFRA]));
    }

    #[test]
    fn test_loud_sandbox_user_stays_low() {
        let out = run(
            "Sandbox broken!!!",
            "MY SANDBOX VM WILL NOT BOOT AFTER THE REIMAGE AND I NEED IT NOW",
        );
        assert_eq!(out["priority"], "LOW");
        assert_eq!(out["matched_rules"], json!([RULE_SANDBOX, RULE_LOUD_USER]));
    }

    #[test]
    fn test_shouting_requires_cased_text() {
        assert!(is_shouting("HELP ME"));
        assert!(!is_shouting("Help me"));
        assert!(!is_shouting("123 !!!"));
    }
}
