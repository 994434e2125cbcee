//! Runs one tool invocation end to end
//!
//! Every outcome becomes a [`CallToolResult`]; failures set the error flag
//! and carry a one-line diagnostic instead of escaping to the transport.

use std::sync::Arc;

use conduit_config::Config;
use conduit_llm::{BridgeError, JsonObject, ResponsesApi, ValidationError, Validator, extract_text, normalize};
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::diagnostic::{diagnostic, error_type};

/// Arguments of the `list_models` tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListModelsArgs {
    /// Only model ids starting with this prefix are returned
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Validates, normalizes and forwards tool calls
pub struct ToolDispatcher {
    api: Arc<dyn ResponsesApi>,
    validator: Validator,
    models_prefix: String,
}

impl ToolDispatcher {
    pub fn new(api: Arc<dyn ResponsesApi>, config: &Config) -> Self {
        Self {
            api,
            validator: Validator::new(&config.validation, &config.defaults),
            models_prefix: config.defaults.models_prefix.clone(),
        }
    }

    pub const fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn default_models_prefix(&self) -> &str {
        &self.models_prefix
    }

    /// Handle a `generate_text` call
    pub async fn generate_text(&self, arguments: Option<JsonObject>) -> CallToolResult {
        let arguments = arguments.unwrap_or_default();
        let outcome = self.try_generate_text(&arguments).await;
        into_result("generate_text", outcome)
    }

    async fn try_generate_text(&self, arguments: &JsonObject) -> Result<String, BridgeError> {
        let args = self.validator.validate(arguments)?;
        let request = normalize(args)?;

        let model = request.model.clone().unwrap_or_default();
        tracing::debug!(tool = "generate_text", model = %model, "forwarding request");

        match self.api.create_response(&request).await {
            Ok(response) => Ok(extract_text(&response)),
            Err(error) => {
                tracing::warn!(
                    tool = "generate_text",
                    model = %model,
                    body = %serde_json::Value::Object(request.to_body()),
                    "attempted request"
                );
                Err(error)
            }
        }
    }

    /// Handle a `list_models` call
    pub async fn list_models(&self, arguments: Option<JsonObject>) -> CallToolResult {
        let outcome = match self.list_models_args(arguments) {
            Ok(args) => {
                let prefix = args.prefix.unwrap_or_else(|| self.models_prefix.clone());
                self.try_list_models(&prefix).await
            }
            Err(error) => Err(error.into()),
        };
        into_result("list_models", outcome)
    }

    fn list_models_args(&self, arguments: Option<JsonObject>) -> Result<ListModelsArgs, ValidationError> {
        let Some(arguments) = arguments else {
            return Ok(ListModelsArgs::default());
        };

        let strict = self.validator.unknown_field_policy().is_strict();
        let mut args = ListModelsArgs::default();
        for (key, value) in arguments {
            if key == "prefix" {
                match value {
                    Value::Null => {}
                    Value::String(prefix) => args.prefix = Some(prefix),
                    _ => return Err(ValidationError::single("prefix", "must be a string")),
                }
            } else if strict {
                return Err(ValidationError::single(key, "is not a recognized field"));
            }
        }

        Ok(args)
    }

    async fn try_list_models(&self, prefix: &str) -> Result<String, BridgeError> {
        let models = self.api.list_models().await?;

        let matching: Vec<String> = models.into_iter().filter(|id| id.starts_with(prefix)).collect();
        tracing::debug!(tool = "list_models", prefix, count = matching.len(), "listed models");

        if matching.is_empty() {
            Ok(format!("No models found with prefix \"{prefix}\""))
        } else {
            Ok(matching.join(", "))
        }
    }
}

fn into_result(tool: &'static str, outcome: Result<String, BridgeError>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(error) => {
            let text = diagnostic(&error);
            tracing::warn!(tool, error_type = error_type(&error), error = %text, "tool call failed");
            CallToolResult::error(vec![Content::text(text)])
        }
    }
}
