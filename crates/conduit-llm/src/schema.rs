//! Declared argument set for `generate_text` and its validator
//!
//! The field table below is the single source of truth: the validator walks
//! it in order and the published JSON Schema is generated from it.

use conduit_config::{DefaultsConfig, ReasoningEffort, UnknownFieldPolicy, ValidationConfig};
use serde_json::{Value, json};

use crate::error::{FieldViolation, ValidationError};
use crate::types::{GenerateArgs, JsonObject, ToolDeclaration, ToolSpec, Verbosity};

const EFFORTS: [&str; 4] = ["minimal", "low", "medium", "high"];
const TRUNCATION: [&str; 2] = ["auto", "disabled"];

/// Accepted shape of one argument
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    /// Integer with an inclusive lower bound
    Integer { min: i64 },
    /// Number within an inclusive range
    Number { min: f64, max: f64 },
    Boolean,
    Enum(&'static [&'static str]),
    Object,
    StringOrArray,
    StringOrObject,
    /// Model identifier, open or restricted by the validation profile
    Model,
    /// Array of shorthand strings or tool objects
    Tools,
    /// Array of message objects
    Messages,
    /// Array of strings
    StringList,
    /// `{effort, summary}` object
    Reasoning,
    /// `{format, verbosity}` object
    TextOptions,
}

/// One declared argument
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    /// Marked deprecated in the published schema
    pub deprecated: bool,
}

const fn field(name: &'static str, kind: FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        description,
        deprecated: false,
    }
}

const fn deprecated(name: &'static str, kind: FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        description,
        deprecated: true,
    }
}

/// Every argument `generate_text` understands, in validation order
pub const GENERATE_TEXT_FIELDS: &[FieldSpec] = &[
    field("model", FieldKind::Model, "Model identifier"),
    field("input", FieldKind::StringOrArray, "Text or list of input items sent to the model"),
    field("messages", FieldKind::Messages, "Chat-style messages, used as input when `input` is absent"),
    field("prompt", FieldKind::String, "Plain prompt, used when neither `input` nor `messages` is given"),
    field("instructions", FieldKind::String, "System-level instructions"),
    field("max_output_tokens", FieldKind::Integer { min: 1 }, "Upper bound on generated tokens"),
    deprecated("max_tokens", FieldKind::Integer { min: 1 }, "Alias of `max_output_tokens`"),
    field("temperature", FieldKind::Number { min: 0.0, max: 2.0 }, "Sampling temperature"),
    field("top_p", FieldKind::Number { min: 0.0, max: 1.0 }, "Nucleus sampling probability mass"),
    field("reasoning", FieldKind::Reasoning, "Reasoning options: `effort` and `summary`"),
    field("reasoning_effort", FieldKind::Enum(&EFFORTS), "Shorthand for `reasoning.effort`"),
    deprecated("verbosity", FieldKind::Enum(&Verbosity::NAMES), "Moved to `text.verbosity`"),
    field("text", FieldKind::TextOptions, "Text output options: `format` and `verbosity`"),
    field("web_search", FieldKind::Boolean, "Enable built-in web search when `tools` is omitted"),
    field("tools", FieldKind::Tools, "Tool names or tool declaration objects"),
    field("tool_choice", FieldKind::StringOrObject, "How the model picks tools"),
    field("parallel_tool_calls", FieldKind::Boolean, "Allow several tool calls at once"),
    field("stream", FieldKind::Boolean, "Accepted for compatibility; responses are never streamed"),
    deprecated("response_format", FieldKind::StringOrObject, "Legacy output format, migrated to `text.format`"),
    field("metadata", FieldKind::Object, "Key/value metadata stored with the response"),
    field("previous_response_id", FieldKind::String, "Continue from an earlier response"),
    field("store", FieldKind::Boolean, "Whether the API stores the response"),
    field("user", FieldKind::String, "End-user identifier"),
    field("truncation", FieldKind::Enum(&TRUNCATION), "Context truncation strategy"),
    field("include", FieldKind::StringList, "Additional output data to include"),
    field("service_tier", FieldKind::String, "Processing tier"),
    field("extra", FieldKind::Object, "Raw fields merged over the final request body"),
];

/// Validates raw `generate_text` arguments against [`GENERATE_TEXT_FIELDS`]
#[derive(Debug, Clone)]
pub struct Validator {
    unknown_fields: UnknownFieldPolicy,
    allowed_models: Vec<String>,
    defaults: DefaultsConfig,
}

impl Validator {
    pub fn new(validation: &ValidationConfig, defaults: &DefaultsConfig) -> Self {
        Self {
            unknown_fields: validation.unknown_fields,
            allowed_models: validation.allowed_models.clone(),
            defaults: defaults.clone(),
        }
    }

    pub const fn unknown_field_policy(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }

    /// Check every field, inject defaults, then apply cross-field rules
    ///
    /// All violations are collected: declared fields in table order, then
    /// unknown fields alphabetically, then cross-field rules.
    pub fn validate(&self, args: &JsonObject) -> Result<GenerateArgs, ValidationError> {
        let mut violations = Vec::new();

        for spec in GENERATE_TEXT_FIELDS {
            if let Some(value) = args.get(spec.name).filter(|v| !v.is_null()) {
                self.check_field(spec, value, &mut violations);
            }
        }

        if self.unknown_fields.is_strict() {
            let mut unknown: Vec<&String> = args.keys().filter(|key| find_spec(key).is_none()).collect();
            unknown.sort();
            violations.extend(
                unknown
                    .into_iter()
                    .map(|key| FieldViolation::new(key.as_str(), "unknown field")),
            );
        }

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        let resolved = self.with_defaults(args);
        let decoded = GenerateArgs::from_object(resolved).map_err(|e| ValidationError::single("arguments", e.to_string()))?;

        check_cross_field(args, &decoded)?;

        Ok(decoded)
    }

    /// Copy of `args` with declared defaults filled in
    fn with_defaults(&self, args: &JsonObject) -> JsonObject {
        let mut resolved: JsonObject = args.iter().filter(|(_, v)| !v.is_null()).map(|(k, v)| (k.clone(), v.clone())).collect();

        resolved
            .entry("model")
            .or_insert_with(|| Value::String(self.defaults.model.clone()));
        resolved.entry("web_search").or_insert(Value::Bool(self.defaults.web_search));

        if let Some(effort) = self.defaults.reasoning_effort {
            let nested_effort = resolved
                .get("reasoning")
                .and_then(|r| r.get("effort"))
                .is_some_and(|e| !e.is_null());
            if !nested_effort && !resolved.contains_key("reasoning_effort") {
                match resolved.get_mut("reasoning") {
                    Some(Value::Object(reasoning)) => {
                        reasoning.insert("effort".to_owned(), Value::String(effort.as_str().to_owned()));
                    }
                    _ => {
                        resolved.insert("reasoning_effort".to_owned(), Value::String(effort.as_str().to_owned()));
                    }
                }
            }
        }

        resolved
    }

    fn check_field(&self, spec: &FieldSpec, value: &Value, violations: &mut Vec<FieldViolation>) {
        let name = spec.name;
        match spec.kind {
            FieldKind::String => expect(value.is_string(), name, "must be a string", violations),
            FieldKind::Boolean => expect(value.is_boolean(), name, "must be a boolean", violations),
            FieldKind::Object => expect(value.is_object(), name, "must be an object", violations),
            FieldKind::StringOrArray => expect(
                value.is_string() || value.is_array(),
                name,
                "must be a string or an array",
                violations,
            ),
            FieldKind::StringOrObject => expect(
                value.is_string() || value.is_object(),
                name,
                "must be a string or an object",
                violations,
            ),
            FieldKind::Integer { min } => check_integer(value, name, min, violations),
            FieldKind::Number { min, max } => check_number(value, name, min, max, violations),
            FieldKind::Enum(allowed) => check_enum(value, name, allowed, violations),
            FieldKind::Model => self.check_model(value, violations),
            FieldKind::StringList => check_string_list(value, name, violations),
            FieldKind::Messages => check_messages(value, violations),
            FieldKind::Tools => check_tools(value, violations),
            FieldKind::Reasoning => check_reasoning(value, violations),
            FieldKind::TextOptions => check_text_options(value, violations),
        }
    }

    fn check_model(&self, value: &Value, violations: &mut Vec<FieldViolation>) {
        let Some(model) = value.as_str().filter(|m| !m.trim().is_empty()) else {
            violations.push(FieldViolation::new("model", "must be a non-empty string"));
            return;
        };

        if !self.allowed_models.is_empty() && !self.allowed_models.iter().any(|m| m == model) {
            violations.push(FieldViolation::new(
                "model",
                format!("`{model}` is not one of: {}", self.allowed_models.join(", ")),
            ));
        }
    }

    /// JSON Schema published as the tool's input schema
    pub fn input_schema(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        for spec in GENERATE_TEXT_FIELDS {
            let mut property = match spec.kind {
                FieldKind::Model if !self.allowed_models.is_empty() => {
                    json!({ "type": "string", "enum": self.allowed_models })
                }
                kind => kind_schema(kind),
            };
            if let Value::Object(property) = &mut property {
                property.insert("description".to_owned(), Value::String(spec.description.to_owned()));
                if spec.deprecated {
                    property.insert("deprecated".to_owned(), Value::Bool(true));
                }
                if let Some(default) = self.default_for(spec.name) {
                    property.insert("default".to_owned(), default);
                }
            }
            properties.insert(spec.name.to_owned(), property);
        }

        let mut schema = JsonObject::new();
        schema.insert("type".to_owned(), json!("object"));
        schema.insert("properties".to_owned(), Value::Object(properties));
        schema.insert(
            "additionalProperties".to_owned(),
            Value::Bool(!self.unknown_fields.is_strict()),
        );
        schema
    }

    fn default_for(&self, name: &str) -> Option<Value> {
        match name {
            "model" => Some(json!(self.defaults.model)),
            "reasoning_effort" => self.defaults.reasoning_effort.map(|e| json!(e.as_str())),
            "web_search" => Some(json!(self.defaults.web_search)),
            _ => None,
        }
    }
}

fn find_spec(name: &str) -> Option<&'static FieldSpec> {
    GENERATE_TEXT_FIELDS.iter().find(|spec| spec.name == name)
}

fn expect(ok: bool, path: &str, reason: &str, violations: &mut Vec<FieldViolation>) {
    if !ok {
        violations.push(FieldViolation::new(path, reason));
    }
}

fn check_integer(value: &Value, path: &str, min: i64, violations: &mut Vec<FieldViolation>) {
    match value.as_i64() {
        Some(n) if n >= min => {}
        Some(_) => violations.push(FieldViolation::new(path, format!("must be at least {min}"))),
        None => violations.push(FieldViolation::new(path, "must be an integer")),
    }
}

fn check_number(value: &Value, path: &str, min: f64, max: f64, violations: &mut Vec<FieldViolation>) {
    match value.as_f64() {
        Some(n) if (min..=max).contains(&n) => {}
        Some(_) => violations.push(FieldViolation::new(path, format!("must be between {min} and {max}"))),
        None => violations.push(FieldViolation::new(path, "must be a number")),
    }
}

fn check_enum(value: &Value, path: &str, allowed: &[&str], violations: &mut Vec<FieldViolation>) {
    if !value.as_str().is_some_and(|s| allowed.contains(&s)) {
        violations.push(FieldViolation::new(path, format!("must be one of: {}", allowed.join(", "))));
    }
}

fn check_string_list(value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    let Some(items) = value.as_array() else {
        violations.push(FieldViolation::new(path, "must be an array of strings"));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        expect(item.is_string(), &format!("{path}[{i}]"), "must be a string", violations);
    }
}

fn check_messages(value: &Value, violations: &mut Vec<FieldViolation>) {
    let Some(messages) = value.as_array() else {
        violations.push(FieldViolation::new("messages", "must be an array of message objects"));
        return;
    };
    for (i, message) in messages.iter().enumerate() {
        let Some(message) = message.as_object() else {
            violations.push(FieldViolation::new(format!("messages[{i}]"), "must be an object"));
            continue;
        };
        if !message.get("role").is_some_and(Value::is_string) {
            violations.push(FieldViolation::new(format!("messages[{i}].role"), "must be a string"));
        }
    }
}

fn check_tools(value: &Value, violations: &mut Vec<FieldViolation>) {
    let Some(tools) = value.as_array() else {
        violations.push(FieldViolation::new("tools", "must be an array"));
        return;
    };
    for (i, tool) in tools.iter().enumerate() {
        match tool {
            Value::String(name) if name.trim().is_empty() => {
                violations.push(FieldViolation::new(format!("tools[{i}]"), "must not be empty"));
            }
            Value::String(name) => {
                if let Some(reason) = ToolDeclaration::shorthand_requires_object(name) {
                    violations.push(FieldViolation::new(format!("tools[{i}]"), reason));
                }
            }
            Value::Object(object) => {
                if let Err(err) = ToolDeclaration::from_object(object.clone()) {
                    let path = if err.field.is_empty() {
                        format!("tools[{i}]")
                    } else {
                        format!("tools[{i}].{}", err.field)
                    };
                    violations.push(FieldViolation::new(path, err.reason));
                }
            }
            _ => violations.push(FieldViolation::new(
                format!("tools[{i}]"),
                "must be a tool name or a tool object",
            )),
        }
    }
}

fn check_reasoning(value: &Value, violations: &mut Vec<FieldViolation>) {
    let Some(reasoning) = value.as_object() else {
        violations.push(FieldViolation::new("reasoning", "must be an object"));
        return;
    };
    if let Some(effort) = reasoning.get("effort").filter(|v| !v.is_null()) {
        check_enum(effort, "reasoning.effort", &EFFORTS, violations);
    }
    if let Some(summary) = reasoning.get("summary").filter(|v| !v.is_null()) {
        expect(summary.is_string(), "reasoning.summary", "must be a string", violations);
    }
}

fn check_text_options(value: &Value, violations: &mut Vec<FieldViolation>) {
    let Some(text) = value.as_object() else {
        violations.push(FieldViolation::new("text", "must be an object"));
        return;
    };
    if let Some(verbosity) = text.get("verbosity").filter(|v| !v.is_null()) {
        check_enum(verbosity, "text.verbosity", &Verbosity::NAMES, violations);
    }
    if let Some(format) = text.get("format").filter(|v| !v.is_null()) {
        expect(
            format.is_string() || format.is_object(),
            "text.format",
            "must be a string or an object",
            violations,
        );
    }
}

/// Where web search in the outgoing request comes from
enum WebSearchSource {
    /// The `web_search` flag, with `tools` omitted
    Flag { explicit: bool },
    /// A `tools` entry
    Tool(usize),
}

/// Whether the request will carry web search, and why
fn web_search_source(raw: &JsonObject, args: &GenerateArgs) -> Option<WebSearchSource> {
    match &args.tools {
        Some(tools) => tools.iter().position(is_web_search_tool).map(WebSearchSource::Tool),
        None => args.web_search.unwrap_or(true).then(|| WebSearchSource::Flag {
            explicit: raw.get("web_search").is_some_and(|v| !v.is_null()),
        }),
    }
}

fn is_web_search_tool(spec: &ToolSpec) -> bool {
    match spec {
        ToolSpec::Shorthand(name) => ToolDeclaration::from_shorthand(name).is_web_search(),
        ToolSpec::Object(object) => ToolDeclaration::from_object(object.clone())
            .as_ref()
            .is_ok_and(ToolDeclaration::is_web_search),
    }
}

/// `minimal` effort leaves no budget for web search
fn check_cross_field(raw: &JsonObject, args: &GenerateArgs) -> Result<(), ValidationError> {
    if args.requested_effort() != Some(ReasoningEffort::Minimal) {
        return Ok(());
    }
    let Some(source) = web_search_source(raw, args) else {
        return Ok(());
    };

    let effort_path = if raw.get("reasoning").and_then(|r| r.get("effort")).is_some_and(|e| !e.is_null()) {
        "reasoning.effort"
    } else {
        "reasoning_effort"
    };

    let reason = match source {
        WebSearchSource::Flag { explicit } => {
            let origin = if explicit { "enabled" } else { "enabled by default" };
            format!(
                "`minimal` reasoning effort cannot be combined with `web_search` ({origin}); set `web_search` to false or raise `{effort_path}`"
            )
        }
        WebSearchSource::Tool(index) => format!(
            "`minimal` reasoning effort cannot be combined with the web search tool in `tools[{index}]`; remove it or raise `{effort_path}`"
        ),
    };

    Err(ValidationError::single(effort_path, reason))
}

fn kind_schema(kind: FieldKind) -> Value {
    match kind {
        FieldKind::String | FieldKind::Model => json!({ "type": "string" }),
        FieldKind::Integer { min } => json!({ "type": "integer", "minimum": min }),
        FieldKind::Number { min, max } => json!({ "type": "number", "minimum": min, "maximum": max }),
        FieldKind::Boolean => json!({ "type": "boolean" }),
        FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
        FieldKind::Object => json!({ "type": "object" }),
        FieldKind::StringOrArray => json!({ "type": ["string", "array"] }),
        FieldKind::StringOrObject => json!({ "type": ["string", "object"] }),
        FieldKind::StringList => json!({ "type": "array", "items": { "type": "string" } }),
        FieldKind::Messages => json!({
            "type": "array",
            "items": { "type": "object", "properties": { "role": { "type": "string" } }, "required": ["role"] }
        }),
        FieldKind::Tools => json!({
            "type": "array",
            "items": {
                "anyOf": [
                    { "type": "string" },
                    { "type": "object", "properties": { "type": { "type": "string" } }, "required": ["type"] }
                ]
            }
        }),
        FieldKind::Reasoning => json!({
            "type": "object",
            "properties": {
                "effort": { "type": "string", "enum": EFFORTS },
                "summary": { "type": "string" }
            }
        }),
        FieldKind::TextOptions => json!({
            "type": "object",
            "properties": {
                "format": { "type": ["string", "object"] },
                "verbosity": { "type": "string", "enum": Verbosity::NAMES }
            }
        }),
    }
}
