//! MCP client session talking to an in-process Conduit server

use std::borrow::Cow;
use std::sync::Arc;

use conduit_config::{ApiKey, Config};
use conduit_llm::OpenAiResponses;
use conduit_mcp::{ConduitServer, ToolDispatcher};
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent, Tool};
use rmcp::service::{RoleClient, RunningService, ServiceError, ServiceExt as _};
use serde_json::Value;

/// A connected client plus the server task behind it
pub struct McpSession {
    client: RunningService<RoleClient, ()>,
    server: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl McpSession {
    /// Start a server with the given config and key and connect to it over
    /// an in-memory duplex stream
    pub async fn start(config: &Config, api_key: &ApiKey) -> anyhow::Result<Self> {
        let api = OpenAiResponses::new(&config.upstream, api_key);
        let server = ConduitServer::new(ToolDispatcher::new(Arc::new(api), config));

        let (server_io, client_io) = tokio::io::duplex(64 * 1024);

        let server = tokio::spawn(async move {
            let running = server.serve(server_io).await?;
            running.waiting().await?;
            anyhow::Ok(())
        });

        let client = ().serve(client_io).await?;

        Ok(Self { client, server })
    }

    pub async fn list_tools(&self) -> anyhow::Result<Vec<Tool>> {
        Ok(self.client.list_all_tools().await?)
    }

    /// Call a tool, surfacing protocol errors
    pub async fn try_call(&self, name: &'static str, arguments: Value) -> Result<CallToolResult, ServiceError> {
        self.client
            .call_tool(CallToolRequestParam {
                name: Cow::Borrowed(name),
                arguments: arguments.as_object().cloned(),
            })
            .await
    }

    /// Call a tool that is expected to produce a result
    pub async fn call(&self, name: &'static str, arguments: Value) -> CallToolResult {
        self.try_call(name, arguments).await.expect("tool call reaches the server")
    }

    /// Close the client and wait for the server to finish
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.client.cancel().await?;
        self.server.await??;
        Ok(())
    }
}

/// Text of the first content part
pub fn text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => &text.text,
        other => panic!("expected text content, got {other:?}"),
    }
}

/// Whether the error flag is set
pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}
