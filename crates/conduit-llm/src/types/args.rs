use conduit_config::ReasoningEffort;
use serde::Deserialize;
use serde_json::Value;

use super::{Input, JsonObject, Reasoning, TextOptions, Verbosity};

/// Validated `generate_text` arguments, aliases still unresolved
///
/// Every modeled field, current or deprecated, has a slot here. Fields the
/// schema does not declare land in `passthrough` (permissive profile only).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerateArgs {
    pub model: Option<String>,
    pub input: Option<Input>,
    pub messages: Option<Vec<Value>>,
    pub prompt: Option<String>,
    pub instructions: Option<String>,
    pub max_output_tokens: Option<u64>,
    /// Deprecated alias of `max_output_tokens`
    pub max_tokens: Option<u64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub reasoning: Option<Reasoning>,
    /// Flat alias of `reasoning.effort`
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Deprecated, moved to `text.verbosity`
    pub verbosity: Option<Verbosity>,
    pub text: Option<TextOptions>,
    /// Controls the default tool list; never forwarded
    pub web_search: Option<bool>,
    pub tools: Option<Vec<ToolSpec>>,
    pub tool_choice: Option<Value>,
    pub parallel_tool_calls: Option<bool>,
    pub stream: Option<bool>,
    /// Legacy output format, migrated to `text.format`
    pub response_format: Option<Value>,
    pub metadata: Option<JsonObject>,
    pub previous_response_id: Option<String>,
    pub store: Option<bool>,
    pub user: Option<String>,
    pub truncation: Option<String>,
    pub include: Option<Vec<String>>,
    pub service_tier: Option<String>,
    /// Merged over the final body, last write wins
    pub extra: Option<JsonObject>,
    #[serde(flatten)]
    pub passthrough: JsonObject,
}

/// A `tools` entry as supplied by the caller
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ToolSpec {
    /// Shorthand such as `"web_search"`
    Shorthand(String),
    /// Full declaration object
    Object(JsonObject),
}

impl GenerateArgs {
    /// Decode an argument object without validating it
    ///
    /// # Errors
    ///
    /// Returns the serde error when a modeled field has the wrong type
    pub fn from_object(object: JsonObject) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(object))
    }

    /// Effort requested through either the flat or the nested field
    pub fn requested_effort(&self) -> Option<ReasoningEffort> {
        self.reasoning
            .as_ref()
            .and_then(|r| r.effort)
            .or(self.reasoning_effort)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> GenerateArgs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unknown_fields_land_in_passthrough() {
        let args = decode(json!({"prompt": "hi", "seed": 42, "x_custom": {"a": 1}}));
        assert_eq!(args.prompt.as_deref(), Some("hi"));
        assert_eq!(args.passthrough.get("seed"), Some(&json!(42)));
        assert_eq!(args.passthrough.get("x_custom"), Some(&json!({"a": 1})));
        assert!(!args.passthrough.contains_key("prompt"));
    }

    #[test]
    fn tools_accept_strings_and_objects() {
        let args = decode(json!({"tools": ["web_search", {"type": "function", "name": "f"}]}));
        let tools = args.tools.unwrap();
        assert_eq!(tools[0], ToolSpec::Shorthand("web_search".to_owned()));
        assert!(matches!(tools[1], ToolSpec::Object(_)));
    }

    #[test]
    fn nested_effort_wins_over_flat() {
        let args = decode(json!({"reasoning": {"effort": "high"}, "reasoning_effort": "low"}));
        assert_eq!(args.requested_effort(), Some(ReasoningEffort::High));

        let args = decode(json!({"reasoning_effort": "minimal"}));
        assert_eq!(args.requested_effort(), Some(ReasoningEffort::Minimal));
    }

    #[test]
    fn nulls_read_as_absent() {
        let args = decode(json!({"input": null, "temperature": null}));
        assert_eq!(args, GenerateArgs::default());
    }
}
