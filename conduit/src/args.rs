use std::path::PathBuf;

use clap::Parser;
use conduit_config::UnknownFieldPolicy;

/// Conduit MCP bridge
#[derive(Debug, Parser)]
#[command(name = "conduit", about = "MCP server forwarding text generation to the OpenAI Responses API")]
pub struct Args {
    /// Path to configuration file; searched for in the usual places when omitted
    #[arg(short, long, env = "CONDUIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directive, overrides `RUST_LOG` and the configured filter
    #[arg(long, env = "CONDUIT_LOG")]
    pub log_filter: Option<String>,

    /// Override how undeclared tool arguments are handled (`strict` or `permissive`)
    #[arg(long, value_name = "POLICY")]
    pub unknown_fields: Option<UnknownFieldPolicy>,
}
