#![allow(clippy::must_use_candidate)]

pub mod defaults;
mod env;
mod loader;
pub mod secret;
pub mod telemetry;
pub mod upstream;
pub mod validation;

use serde::Deserialize;

pub use defaults::*;
pub use loader::LoadedConfig;
pub use secret::{ApiKey, ApiKeySource};
pub use telemetry::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};
pub use upstream::*;
pub use validation::*;

/// Top-level Conduit configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Downstream Responses API connection
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Values injected when a tool call omits them
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Argument validation profile
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Logging and trace export
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
