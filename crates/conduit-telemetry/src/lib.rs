//! Logging and trace export for Conduit
//!
//! Every log line goes to stderr; stdout belongs to the MCP transport.

mod metadata;

use conduit_config::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig, WithTonicConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue, MetadataMap};

/// Environment variable consulted before the configured filter
const LOG_ENV: &str = "RUST_LOG";

/// Guard that flushes and shuts down trace export on drop
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported
    pub const fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize logging and, when configured, OTLP span export
///
/// `log_filter` comes from the command line and wins over `RUST_LOG`, which
/// in turn wins over the configured filter. Returns a guard that must be held
/// for the lifetime of the process.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or a global subscriber
/// is already installed
pub fn init(config: &TelemetryConfig, log_filter: Option<&str>) -> anyhow::Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let directive = resolve_filter(log_filter, std::env::var(LOG_ENV).ok(), &config.log_filter);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut guard = TelemetryGuard { tracer_provider: None };

    let otel_layer = match &config.exporter {
        Some(exporter) => {
            let tracer_provider = init_tracer(config, exporter)?;
            let tracer = tracer_provider.tracer("conduit");
            global::set_tracer_provider(tracer_provider.clone());
            guard.tracer_provider = Some(tracer_provider);
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    let pretty_layer = (config.format == LogFormat::Pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
    });

    let json_layer = (config.format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(guard)
}

/// Pick the first non-blank filter directive
fn resolve_filter(cli: Option<&str>, env: Option<String>, configured: &str) -> String {
    cli.map(str::to_owned)
        .into_iter()
        .chain(env)
        .find(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| configured.to_owned())
}

fn init_tracer(config: &TelemetryConfig, exporter_config: &ExporterConfig) -> anyhow::Result<SdkTracerProvider> {
    let exporter = build_span_exporter(exporter_config)?;

    let provider = SdkTracerProvider::builder()
        .with_resource(metadata::build_resource(config))
        .with_batch_exporter(exporter)
        .build();

    Ok(provider)
}

/// Build OTLP span exporter based on protocol
fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<opentelemetry_otlp::SpanExporter> {
    use opentelemetry_otlp::SpanExporter;

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .with_metadata(grpc_metadata(config)?)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint.as_str())
            .with_headers(config.headers.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(exporter)
}

fn grpc_metadata(config: &ExporterConfig) -> anyhow::Result<MetadataMap> {
    let mut metadata = MetadataMap::new();

    for (key, value) in &config.headers {
        let key = AsciiMetadataKey::from_bytes(key.to_ascii_lowercase().as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid exporter header name {key:?}: {e}"))?;
        let value = AsciiMetadataValue::try_from(value.as_str())
            .map_err(|e| anyhow::anyhow!("invalid value for exporter header {key:?}: {e}"))?;
        metadata.insert(key, value);
    }

    Ok(metadata)
}
