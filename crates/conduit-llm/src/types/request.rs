use conduit_config::ReasoningEffort;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{JsonObject, ToolDeclaration};

/// Body of a `POST /responses` call
///
/// Built only by the normalizer. Legacy and alias fields never appear here;
/// fields the schema does not model travel in `passthrough`, and the
/// caller's `extra` object is applied last by [`CanonicalRequest::to_body`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub input: Input,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDeclaration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    /// Only ever `Some(false)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
    /// A `json_schema` response format kept for inspection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format_original: Option<Value>,
    #[serde(flatten)]
    pub passthrough: JsonObject,
    #[serde(skip)]
    pub overrides: JsonObject,
}

impl CanonicalRequest {
    /// JSON body with `overrides` merged over the modeled fields
    pub fn to_body(&self) -> JsonObject {
        let mut body = match serde_json::to_value(self) {
            Ok(Value::Object(body)) => body,
            _ => JsonObject::new(),
        };

        for (key, value) in &self.overrides {
            body.insert(key.clone(), value.clone());
        }

        if body.get("stream").is_some_and(is_truthy) {
            body.insert("stream".to_owned(), Value::Bool(false));
        }

        body
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "false",
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Model input: plain text or a list of input items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    Text(String),
    Items(Vec<Value>),
}

/// Reasoning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reasoning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<ReasoningEffort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Reasoning {
    pub fn with_effort(effort: ReasoningEffort) -> Self {
        Self {
            effort: Some(effort),
            summary: None,
            extra: JsonObject::new(),
        }
    }
}

/// Text output options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Answer length preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Low,
    Medium,
    High,
}

impl Verbosity {
    pub const NAMES: [&'static str; 3] = ["low", "medium", "high"];
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal(input: Input) -> CanonicalRequest {
        CanonicalRequest {
            model: Some("gpt-5".to_owned()),
            input,
            instructions: None,
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            reasoning: None,
            text: None,
            tools: None,
            tool_choice: None,
            parallel_tool_calls: None,
            stream: None,
            metadata: None,
            previous_response_id: None,
            store: None,
            user: None,
            truncation: None,
            include: None,
            service_tier: None,
            response_format_original: None,
            passthrough: JsonObject::new(),
            overrides: JsonObject::new(),
        }
    }

    #[test]
    fn body_omits_unset_fields() {
        let body = minimal(Input::Text("hi".to_owned())).to_body();
        assert_eq!(serde_json::Value::Object(body), json!({"model": "gpt-5", "input": "hi"}));
    }

    #[test]
    fn overrides_win_over_modeled_fields() {
        let mut request = minimal(Input::Text("hi".to_owned()));
        request.temperature = Some(0.5);
        request.passthrough.insert("seed".to_owned(), json!(7));
        request.overrides.insert("temperature".to_owned(), json!(1.0));
        request.overrides.insert("x_trace".to_owned(), json!("abc"));

        let body = request.to_body();
        assert_eq!(body["temperature"], json!(1.0));
        assert_eq!(body["seed"], json!(7));
        assert_eq!(body["x_trace"], json!("abc"));
    }

    #[test]
    fn overrides_cannot_turn_streaming_on() {
        let mut request = minimal(Input::Text("hi".to_owned()));
        request.overrides.insert("stream".to_owned(), json!(true));
        assert_eq!(request.to_body()["stream"], json!(false));
    }

    #[test]
    fn items_input_serializes_as_array() {
        let body = minimal(Input::Items(vec![json!({"role": "user", "content": "hi"})])).to_body();
        assert_eq!(body["input"], json!([{"role": "user", "content": "hi"}]));
    }
}
