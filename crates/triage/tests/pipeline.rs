use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use triage::{
    CriteriaText, IssueDraft, LlmGateway, Priority, TriageContext, TriagePipeline, TriageResult,
    FALLBACK_RULE, INSUFFICIENT_INFO_RULE,
};

/// Returns a fixed response and records the prompts it was given.
struct ScriptedGateway {
    response: String,
    seen: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> String {
        self.seen
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.response.clone()
    }
}

fn pipeline() -> TriagePipeline {
    let criteria = CriteriaText::new("Rule A: Silent Crisis").unwrap();
    TriagePipeline::new(Arc::new(TriageContext::new(criteria)))
}

fn detailed_outage() -> IssueDraft {
    IssueDraft::new("Production DB outage")
        .with_body("Customers seeing 503s on checkout, revenue impact, prod down")
        .with_repo("demo/repo")
        .with_url("https://github.com/demo/repo/issues/7")
}

const HIGH_RESPONSE: &str = r#"{
  "priority": "HIGH",
  "action_required": true,
  "labels": ["priority:high", "outage"],
  "reasoning": "Production outage impacting customers.",
  "confidence": 0.99,
  "matched_rules": ["HIGH: Production impact"]
}"#;

#[tokio::test]
async fn test_valid_high_verdict_passes_through() {
    let gateway = ScriptedGateway::new(HIGH_RESPONSE);
    let result = pipeline().triage(&gateway, &detailed_outage()).await;

    assert_eq!(result.priority(), Priority::High);
    assert!(result.action_required());
    assert_eq!(result.labels(), ["priority:high", "outage"]);
    assert_eq!(result.matched_rules(), ["HIGH: Production impact"]);
    assert_eq!(result.confidence().as_f64(), 0.99);
}

#[tokio::test]
async fn test_prompts_carry_criteria_and_issue_fields() {
    let gateway = ScriptedGateway::new(HIGH_RESPONSE);
    pipeline().triage(&gateway, &detailed_outage()).await;

    let seen = gateway.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (system, user) = &seen[0];
    assert!(system.contains("Rule A: Silent Crisis"));
    assert!(user.contains("Issue Title: Production DB outage"));
    assert!(user.contains("Repository: demo/repo"));
}

#[tokio::test]
async fn test_non_json_output_yields_fallback() {
    let gateway = ScriptedGateway::new("not json");
    let result = pipeline().triage(&gateway, &detailed_outage()).await;

    assert_eq!(result, TriageResult::fallback());
    assert!(result.matched_rules().iter().any(|r| r == FALLBACK_RULE));
}

#[tokio::test]
async fn test_empty_output_yields_fallback() {
    let gateway = ScriptedGateway::new("");
    let result = pipeline().triage(&gateway, &detailed_outage()).await;
    assert!(result.is_fallback());
}

#[tokio::test]
async fn test_vague_issue_overrides_confident_high() {
    let gateway = ScriptedGateway::new(HIGH_RESPONSE);
    let issue = IssueDraft::new("Help").with_body("Broken");
    let result = pipeline().triage(&gateway, &issue).await;

    assert_eq!(result.priority(), Priority::Low);
    assert!(!result.action_required());
    assert_eq!(result.labels(), ["priority:low"]);
    assert!(result.confidence().as_f64() <= 0.2);
    assert!(result
        .matched_rules()
        .iter()
        .any(|r| r == INSUFFICIENT_INFO_RULE));
    assert!(!result.missing_info_requests().is_empty());
}

#[tokio::test]
async fn test_vague_issue_with_invalid_output_keeps_both_sentinels() {
    let gateway = ScriptedGateway::new("```json\n{oops}\n```");
    let result = pipeline().triage(&gateway, &IssueDraft::new("")).await;

    assert_eq!(result.matched_rules(), [FALLBACK_RULE, INSUFFICIENT_INFO_RULE]);
    assert_eq!(result.confidence().as_f64(), 0.0);
}

#[tokio::test]
async fn test_concurrent_triage_is_independent() {
    let pipeline = pipeline();
    let high = Arc::new(ScriptedGateway::new(HIGH_RESPONSE));
    let broken = Arc::new(ScriptedGateway::new("nope"));

    let a = {
        let pipeline = pipeline.clone();
        let high = Arc::clone(&high);
        tokio::spawn(async move { pipeline.triage(high.as_ref(), &detailed_outage()).await })
    };
    let b = {
        let pipeline = pipeline.clone();
        let broken = Arc::clone(&broken);
        tokio::spawn(async move { pipeline.triage(broken.as_ref(), &detailed_outage()).await })
    };

    assert_eq!(a.await.unwrap().priority(), Priority::High);
    assert!(b.await.unwrap().is_fallback());
}
