#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::sync::Arc;

use args::Args;
use clap::Parser;
use conduit_config::{ApiKey, Config};
use conduit_llm::OpenAiResponses;
use conduit_mcp::{ConduitServer, ToolDispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut loaded = Config::discover(args.config.as_deref())?;
    if let Some(policy) = args.unknown_fields {
        loaded.config.validation.unknown_fields = policy;
    }

    // Initialize telemetry
    let telemetry_guard = conduit_telemetry::init(&loaded.config.telemetry, args.log_filter.as_deref())?;

    let api_key = ApiKey::resolve(&loaded);

    tracing::info!(
        config_path = %loaded.path.as_ref().map_or_else(|| "<defaults>".into(), |p| p.display().to_string()),
        api_key_source = %api_key.source(),
        unknown_fields = ?loaded.config.validation.unknown_fields,
        trace_export = telemetry_guard.is_exporting(),
        "starting conduit"
    );

    if api_key.secret().is_none() {
        tracing::warn!("no API key found, tool calls will fail until one is configured");
    }

    let api = OpenAiResponses::new(&loaded.config.upstream, &api_key);
    let server = ConduitServer::new(ToolDispatcher::new(Arc::new(api), &loaded.config));

    tokio::select! {
        result = server.serve_stdio() => result?,
        () = shutdown_signal() => {}
    }

    tracing::info!("conduit stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
