//! Router, handlers and server loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use github::{ActionExecutor, ActionReport, IssueRef};
use llm::LlmSettings;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::Instrument;
use triage::{
    IssueDraft, IssueNumber, RepositoryName, Timestamp, TriagePipeline, TriageResult, TriageRunId,
    TRIAGE_SCHEMA_VERSION,
};

use crate::errors::WebhookError;
use crate::payload::IssuesEvent;
use crate::settings::WebhookSettings;
use crate::signature::{verify_signature, SIGNATURE_HEADER};

const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

/// State shared by every request. Read-only after startup.
pub struct AppState {
    pub webhook: WebhookSettings,
    pub llm: LlmSettings,
    pub http: reqwest::Client,
    pub pipeline: TriagePipeline,
    pub executor: ActionExecutor,
}

#[derive(Debug, Serialize)]
struct TriagedResponse {
    ok: bool,
    run_id: TriageRunId,
    received_at: Timestamp,
    repo: RepositoryName,
    issue_number: IssueNumber,
    schema_version: u32,
    triage: TriageResult,
    dry_run: bool,
    actions: ActionReport,
}

#[derive(Debug, Serialize)]
struct IgnoredResponse<'a> {
    ok: bool,
    ignored: bool,
    event: &'a str,
    action: &'a str,
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook/github", post(github_webhook))
        .with_state(state)
}

/// Serves `state` on `addr` until Ctrl-C.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening for GitHub webhooks");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn github_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    let run_id = TriageRunId::new_random();
    let span = tracing::info_span!(
        "webhook",
        %run_id,
        delivery = header_str(&headers, DELIVERY_HEADER).unwrap_or("-"),
    );
    handle_delivery(&state, &headers, &body, run_id)
        .instrument(span)
        .await
}

async fn handle_delivery(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
    run_id: TriageRunId,
) -> Result<Response, WebhookError> {
    let received_at = Timestamp::now();

    match &state.webhook.secret {
        Some(secret) => {
            let valid = header_str(headers, SIGNATURE_HEADER)
                .is_some_and(|sig| verify_signature(body, secret.expose(), sig));
            if !valid {
                return Err(WebhookError::InvalidSignature);
            }
        }
        None => tracing::warn!("WEBHOOK_SECRET not set; skipping signature verification"),
    }

    let event = header_str(headers, EVENT_HEADER)
        .unwrap_or(state.webhook.allowed_event.as_str());
    if event != state.webhook.allowed_event {
        return Err(WebhookError::UnsupportedEvent {
            event: event.to_string(),
        });
    }

    let payload: IssuesEvent =
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload {
            message: e.to_string(),
        })?;

    let action = payload
        .action
        .as_deref()
        .filter(|a| !a.is_empty())
        .ok_or(WebhookError::MissingAction)?;
    if !state.webhook.is_allowed_action(action) {
        tracing::info!(event, action, "Ignoring webhook action");
        return Ok(Json(IgnoredResponse {
            ok: true,
            ignored: true,
            event,
            action,
        })
        .into_response());
    }

    let issue = payload.issue.unwrap_or_default();
    let repo = payload
        .repository
        .and_then(|r| r.full_name)
        .and_then(RepositoryName::new);
    let (Some(repo), Some(number), Some(title)) = (
        repo,
        issue.number.map(IssueNumber::new),
        issue.title.filter(|t| !t.is_empty()),
    ) else {
        return Err(WebhookError::MissingFields);
    };
    let url = issue.html_url.unwrap_or_default();

    tracing::info!(repo = %repo, issue = %number, action, "Triage requested");

    let draft = IssueDraft {
        title,
        body: Some(issue.body.unwrap_or_default()),
        repo: Some(repo.to_string()),
        url: Some(url.clone()),
    };
    let gateway = llm::select_gateway(&state.llm, &state.http);
    let verdict = state.pipeline.triage(gateway.as_ref(), &draft).await;

    let issue_ref = IssueRef {
        repo: repo.clone(),
        number,
        url,
    };
    let actions = state.executor.execute(&verdict, &issue_ref).await?;

    Ok(Json(TriagedResponse {
        ok: true,
        run_id,
        received_at,
        repo,
        issue_number: number,
        schema_version: TRIAGE_SCHEMA_VERSION,
        triage: verdict,
        dry_run: state.executor.is_dry_run(),
        actions,
    })
    .into_response())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
