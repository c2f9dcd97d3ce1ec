//! issue-triager entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Load configuration**: read `.env` (if present) and the process
//!    environment into an [`config::AppConfig`], failing fast on invalid values.
//! 2. **Wire observability**: install `tracing-subscriber` with a JSON or text
//!    layer and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set, an OpenTelemetry
//!    OTLP exporter. All spans and events from every workspace crate flow
//!    through it.
//! 3. **Construct infrastructure**: the shared `reqwest` client, the
//!    [`triage::TriagePipeline`] over the criteria document, the
//!    [`github::ActionExecutor`] and the backend chosen by
//!    [`llm::select_gateway`].
//! 4. **Run a command**:
//!    - `serve` runs the webhook receiver.
//!    - `triage` triages one issue from the command line.
//!    - `eval` scores the golden dataset.
//!    - `simulate` posts a sample delivery to a running receiver.

mod config;
mod eval;
mod simulate;
mod telemetry;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use github::ActionExecutor;
use listener::AppState;
use llm::{select_gateway, KeywordStub};
use tracing::Instrument;
use triage::{IssueDraft, LlmGateway, TriageContext, TriagePipeline, TriageRunId};

use crate::config::{load_criteria, AppConfig};

#[derive(Debug, Parser)]
#[command(name = "issue-triager", version, about = "Triage GitHub issues with an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the GitHub webhook receiver on PORT.
    Serve,

    /// Triage a single issue and print the verdict as JSON.
    Triage {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        repo: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },

    /// Score the golden dataset; exits non-zero unless every case passes.
    Eval {
        #[arg(long, default_value = eval::DEFAULT_DATASET_PATH)]
        dataset: PathBuf,
        /// Use the configured backend instead of the keyword stub.
        #[arg(long)]
        configured_backend: bool,
    },

    /// Post a sample `issues/opened` delivery to a running receiver.
    Simulate {
        /// Defaults to the local receiver on PORT.
        #[arg(long, env = "WEBHOOK_URL")]
        url: Option<String>,
        /// Golden case to use as the issue content.
        #[arg(long, env = "DEMO_CASE_ID")]
        case_id: Option<String>,
        #[arg(long, default_value = eval::DEFAULT_DATASET_PATH)]
        dataset: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let _telemetry = telemetry::init(&config.log)?;

    tracing::info!(app_env = %config.app_env, "issue-triager starting");

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Triage {
            title,
            body,
            repo,
            url,
        } => {
            let issue = IssueDraft {
                title,
                body,
                repo,
                url,
            };
            triage_one(config, issue).await
        }
        Command::Eval {
            dataset,
            configured_backend,
        } => run_eval(config, &dataset, configured_backend).await,
        Command::Simulate {
            url,
            case_id,
            dataset,
        } => run_simulate(config, url, case_id.as_deref(), &dataset).await,
    }
}

fn build_pipeline(config: &AppConfig) -> anyhow::Result<TriagePipeline> {
    let criteria = load_criteria(&config.criteria_path)?;
    Ok(TriagePipeline::new(Arc::new(TriageContext::new(criteria))))
}

async fn serve(config: AppConfig) -> anyhow::Result<ExitCode> {
    let pipeline = build_pipeline(&config)?;
    let http = reqwest::Client::new();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook.port));

    tracing::info!(
        backend = ?config.llm.backend,
        dry_run = config.github.dry_run,
        signature_check = config.webhook.secret.is_some(),
        "Starting webhook receiver"
    );

    let state = Arc::new(AppState {
        executor: ActionExecutor::new(config.github, http.clone()),
        webhook: config.webhook,
        llm: config.llm,
        http,
        pipeline,
    });
    listener::serve(state, addr)
        .await
        .context("webhook server failed")?;
    Ok(ExitCode::SUCCESS)
}

async fn triage_one(config: AppConfig, issue: IssueDraft) -> anyhow::Result<ExitCode> {
    let pipeline = build_pipeline(&config)?;
    let http = reqwest::Client::new();
    let gateway = select_gateway(&config.llm, &http);

    let run_id = TriageRunId::new_random();
    let span = tracing::info_span!("cli_triage", %run_id, backend = gateway.name());
    let result = pipeline
        .triage(gateway.as_ref(), &issue)
        .instrument(span)
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::SUCCESS)
}

async fn run_eval(
    config: AppConfig,
    dataset: &std::path::Path,
    configured_backend: bool,
) -> anyhow::Result<ExitCode> {
    let pipeline = build_pipeline(&config)?;
    let cases = eval::load_dataset(dataset)?;
    let http = reqwest::Client::new();
    let gateway: Box<dyn LlmGateway> = if configured_backend {
        select_gateway(&config.llm, &http)
    } else {
        Box::new(KeywordStub)
    };

    tracing::info!(cases = cases.len(), backend = gateway.name(), "Evaluating golden dataset");
    let report = eval::run(&pipeline, gateway.as_ref(), &cases).await;
    print!("{report}");

    Ok(if report.is_perfect() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_simulate(
    config: AppConfig,
    url: Option<String>,
    case_id: Option<&str>,
    dataset: &std::path::Path,
) -> anyhow::Result<ExitCode> {
    let url = url.unwrap_or_else(|| {
        format!("http://localhost:{}/webhook/github", config.webhook.port)
    });
    let case = simulate::pick_case(dataset, case_id);
    let payload = simulate::build_payload(case.as_ref());

    let (status, body) = simulate::send(
        &reqwest::Client::new(),
        &url,
        &payload,
        config.webhook.secret.as_ref(),
    )
    .await?;
    println!("Status: {status}");
    println!("{body}");
    Ok(ExitCode::SUCCESS)
}
