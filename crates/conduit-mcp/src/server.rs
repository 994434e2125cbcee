use std::sync::Arc;

use anyhow::Context as _;
use conduit_config::UnknownFieldPolicy;
use conduit_llm::JsonObject;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ServerCapabilities,
    ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer, ServiceExt as _};
use rmcp::transport::io::stdio;
use rmcp::{ErrorData, ServerHandler};
use serde_json::Value;

use crate::dispatcher::{ListModelsArgs, ToolDispatcher};

pub const GENERATE_TEXT: &str = "generate_text";
pub const LIST_MODELS: &str = "list_models";

const GENERATE_TEXT_DESCRIPTION: &str = "Generate text with an OpenAI model through the Responses API. \
    Supply the content as `input` (text or input items), `messages` (chat messages) or `prompt`. \
    Web search is enabled by default; set `web_search` to false or pass your own `tools` to change that.";

const LIST_MODELS_DESCRIPTION: &str = "List the ids of available models that start with a prefix.";

const INSTRUCTIONS: &str = "Conduit forwards requests to the OpenAI Responses API.\n\n\
    Tools:\n\
    - generate_text: produce text from `input`, `messages` or `prompt`\n\
    - list_models: find model ids by prefix\n\n\
    Failed calls return a single diagnostic line with the error flag set.";

/// MCP server exposing the text generation tools
#[derive(Clone)]
pub struct ConduitServer {
    dispatcher: Arc<ToolDispatcher>,
    tools: Arc<[Tool]>,
}

impl ConduitServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        let tools = tool_definitions(&dispatcher);
        Self {
            dispatcher: Arc::new(dispatcher),
            tools: tools.into(),
        }
    }

    /// Tools advertised to clients
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Serve over stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await.context("failed to start MCP service")?;
        tracing::info!("MCP session started");

        let reason = service.waiting().await.context("MCP service task failed")?;
        tracing::info!(?reason, "MCP session ended");

        Ok(())
    }
}

impl ServerHandler for ConduitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "conduit".to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_owned()),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools.to_vec()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request.arguments;
        match request.name.as_ref() {
            GENERATE_TEXT => Ok(self.dispatcher.generate_text(arguments).await),
            LIST_MODELS => Ok(self.dispatcher.list_models(arguments).await),
            other => {
                tracing::warn!(tool = other, "call to unknown tool");
                Err(ErrorData::invalid_params(format!("unknown tool: {other}"), None))
            }
        }
    }
}

fn tool_definitions(dispatcher: &ToolDispatcher) -> Vec<Tool> {
    let validator = dispatcher.validator();
    vec![
        Tool::new(GENERATE_TEXT, GENERATE_TEXT_DESCRIPTION, Arc::new(validator.input_schema())),
        Tool::new(
            LIST_MODELS,
            LIST_MODELS_DESCRIPTION,
            Arc::new(list_models_schema(validator.unknown_field_policy(), dispatcher.default_models_prefix())),
        ),
    ]
}

fn list_models_schema(policy: UnknownFieldPolicy, default_prefix: &str) -> JsonObject {
    let schema = schemars::schema_for!(ListModelsArgs);
    let mut schema = schema.as_object().cloned().unwrap_or_default();
    schema.remove("$schema");
    schema.insert("additionalProperties".to_owned(), Value::Bool(!policy.is_strict()));

    if let Some(Value::Object(properties)) = schema.get_mut("properties")
        && let Some(Value::Object(prefix)) = properties.get_mut("prefix")
    {
        prefix.insert("default".to_owned(), Value::String(default_prefix.to_owned()));
    }

    schema
}
