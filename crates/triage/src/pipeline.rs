//! The triage pipeline: prompts → model → normalise → validate → guard.

use std::sync::Arc;

use tracing::Instrument;

use crate::gateway::LlmGateway;
use crate::guard;
use crate::normalize::normalize;
use crate::prompt::build_prompts;
use crate::types::CriteriaText;
use crate::validate::validate;
use crate::verdict::TriageResult;

/// Read-only state shared by every triage call.
#[derive(Debug, Clone)]
pub struct TriageContext {
    criteria: CriteriaText,
}

impl TriageContext {
    pub fn new(criteria: CriteriaText) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &CriteriaText {
        &self.criteria
    }
}

/// The issue fields the pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub body: Option<String>,
    pub repo: Option<String>,
    pub url: Option<String>,
}

impl IssueDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Turns issues into verdicts.
///
/// Cheap to clone; holds only an [`Arc`] to the shared [`TriageContext`]. Safe
/// to call concurrently for distinct issues.
#[derive(Debug, Clone)]
pub struct TriagePipeline {
    context: Arc<TriageContext>,
}

impl TriagePipeline {
    pub fn new(context: Arc<TriageContext>) -> Self {
        Self { context }
    }

    /// Triages one issue with `gateway`.
    ///
    /// Never fails: unusable model output degrades to
    /// [`TriageResult::fallback`], and the vague-issue guard runs last on
    /// every path.
    pub async fn triage(&self, gateway: &dyn LlmGateway, issue: &IssueDraft) -> TriageResult {
        let span = tracing::info_span!(
            "triage",
            backend = gateway.name(),
            repo = issue.repo.as_deref().unwrap_or("unknown"),
        );

        async {
            let prompts = build_prompts(
                self.context.criteria(),
                &issue.title,
                issue.body.as_deref(),
                issue.repo.as_deref(),
                issue.url.as_deref(),
            );

            let raw = gateway.generate(&prompts.system, &prompts.user).await;
            let verdict = interpret(&raw);
            let verdict = guard::apply(verdict, &issue.title, issue.body.as_deref());

            tracing::info!(
                priority = %verdict.priority(),
                action_required = verdict.action_required(),
                confidence = verdict.confidence().as_f64(),
                matched_rules = ?verdict.matched_rules(),
                "Issue triaged"
            );
            verdict
        }
        .instrument(span)
        .await
    }
}

/// Converts raw model text into a verdict, falling back on any parse or
/// validation failure. Does not apply the vague-issue guard.
pub fn interpret(raw: &str) -> TriageResult {
    let validated = normalize(raw)
        .map_err(|e| (e.kind(), e.to_string()))
        .and_then(|fields| validate(fields).map_err(|e| (e.kind(), e.to_string())));

    match validated {
        Ok(result) => result,
        Err((kind, error)) => {
            tracing::error!(
                kind = kind.as_str(),
                %error,
                raw_output = raw,
                "Unusable LLM output; using fallback verdict"
            );
            TriageResult::fallback()
        }
    }
}
