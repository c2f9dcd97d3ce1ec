//! Subscriber installation: env filter, JSON or text formatting, and an
//! optional OTLP span exporter.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LogSettings};

const SERVICE_NAME: &str = "issue-triager";

/// Flushes exported spans when dropped.
pub struct TelemetryGuard {
    provider: Option<TracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(error) = provider.shutdown() {
                eprintln!("Failed to flush OpenTelemetry spans: {error}");
            }
        }
    }
}

/// Installs the global subscriber. Must run inside the Tokio runtime when an
/// OTLP endpoint is configured.
///
/// `RUST_LOG` takes precedence over `settings.level`.
pub fn init(settings: &LogSettings) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    let provider = match &settings.otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint.clone())
                .build()?;
            Some(
                TracerProvider::builder()
                    .with_batch_exporter(exporter, runtime::Tokio)
                    .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
                    .build(),
            )
        }
        None => None,
    };
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    let (json_layer, text_layer) = match settings.format {
        LogFormat::Json => (
            Some(fmt::layer().json().with_current_span(true).with_span_list(false)),
            None,
        ),
        LogFormat::Text => (None, Some(fmt::layer().with_target(true))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(TelemetryGuard { provider })
}
