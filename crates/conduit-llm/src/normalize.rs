//! Turns validated arguments into the canonical Responses API body
//!
//! Steps run in a fixed order because later ones read what earlier ones
//! produce (the verbosity and response format migrations both write into
//! `text`). Only content resolution can fail; everything else is
//! best-effort.

use serde_json::Value;

use crate::error::NormalizationError;
use crate::types::{
    BuiltinTool, CanonicalRequest, GenerateArgs, Input, JsonObject, Reasoning, TextOptions, ToolDeclaration, ToolSpec,
};

/// Format tag written into `text.format` for every recognized JSON format
const JSON_FORMAT: &str = "json";

/// Build the canonical request from validated arguments
///
/// # Errors
///
/// Returns [`NormalizationError`] when no usable content field is present
pub fn normalize(args: GenerateArgs) -> Result<CanonicalRequest, NormalizationError> {
    let GenerateArgs {
        model,
        input,
        messages,
        prompt,
        instructions,
        max_output_tokens,
        max_tokens,
        temperature,
        top_p,
        reasoning,
        reasoning_effort,
        verbosity,
        text,
        web_search,
        tools,
        tool_choice,
        parallel_tool_calls,
        stream,
        response_format,
        metadata,
        previous_response_id,
        store,
        user,
        truncation,
        include,
        service_tier,
        extra,
        passthrough,
    } = args;

    let input = resolve_input(input, messages, prompt)?;

    let max_output_tokens = max_output_tokens.or(max_tokens);

    let reasoning = reasoning.or_else(|| reasoning_effort.map(Reasoning::with_effort));

    let mut text = text;
    if let Some(verbosity) = verbosity {
        let options = text.get_or_insert_with(TextOptions::default);
        options.verbosity.get_or_insert(verbosity);
    }

    let stream = stream.map(|_| false);

    let tools = normalize_tools(tools, web_search.unwrap_or(true));

    let mut response_format_original = None;
    if let Some(format) = response_format {
        match response_format_kind(&format) {
            Some(kind) => {
                let options = text.get_or_insert_with(TextOptions::default);
                options
                    .format
                    .get_or_insert_with(|| Value::String(JSON_FORMAT.to_owned()));
                if kind == FormatKind::JsonSchema {
                    response_format_original = Some(format);
                }
            }
            None => tracing::debug!("dropping unrecognized response_format"),
        }
    }

    Ok(CanonicalRequest {
        model,
        input,
        instructions,
        max_output_tokens,
        temperature,
        top_p,
        reasoning,
        text,
        tools,
        tool_choice,
        parallel_tool_calls,
        stream,
        metadata,
        previous_response_id,
        store,
        user,
        truncation,
        include,
        service_tier,
        response_format_original,
        passthrough,
        overrides: extra.unwrap_or_default(),
    })
}

/// `input`, then non-empty `messages`, then `prompt`
fn resolve_input(
    input: Option<Input>,
    messages: Option<Vec<Value>>,
    prompt: Option<String>,
) -> Result<Input, NormalizationError> {
    if let Some(input) = input {
        return Ok(input);
    }

    let messages_were_empty = match messages {
        Some(messages) if !messages.is_empty() => return Ok(Input::Items(messages)),
        Some(_) => true,
        None => false,
    };

    if let Some(prompt) = prompt {
        return Ok(Input::Text(prompt));
    }

    if messages_were_empty {
        Err(NormalizationError::EmptyMessages)
    } else {
        Err(NormalizationError::MissingContent)
    }
}

/// Expand shorthands, retag legacy entries, inject the web search default
fn normalize_tools(tools: Option<Vec<ToolSpec>>, web_search: bool) -> Option<Vec<ToolDeclaration>> {
    let Some(tools) = tools else {
        return web_search.then(|| vec![ToolDeclaration::web_search()]);
    };

    let normalized = tools
        .into_iter()
        .map(|spec| match spec {
            ToolSpec::Shorthand(name) => ToolDeclaration::from_shorthand(&name),
            ToolSpec::Object(object) => ToolDeclaration::from_object(object.clone()).unwrap_or_else(|err| {
                tracing::debug!(reason = %err.reason, "forwarding tool object as given");
                opaque_tool(object)
            }),
        })
        .collect();

    Some(normalized)
}

/// Keep an object the schema could not classify
fn opaque_tool(mut object: JsonObject) -> ToolDeclaration {
    let kind = match object.remove("type") {
        Some(Value::String(kind)) => kind,
        _ => String::new(),
    };
    ToolDeclaration::Builtin(BuiltinTool { kind, options: object })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    Json,
    /// Carries a schema that has no canonical slot
    JsonSchema,
}

fn response_format_kind(format: &Value) -> Option<FormatKind> {
    match format {
        Value::String(s) if s.eq_ignore_ascii_case(JSON_FORMAT) => Some(FormatKind::Json),
        Value::Object(object) => match object.get("type").and_then(Value::as_str) {
            Some("json" | "json_object") => Some(FormatKind::Json),
            Some("json_schema") => Some(FormatKind::JsonSchema),
            _ => None,
        },
        _ => None,
    }
}
