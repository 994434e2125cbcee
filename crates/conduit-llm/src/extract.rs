use serde_json::Value;

/// Flatten a Responses API result into plain text
///
/// Prefers the aggregated `output_text`, then the text parts of every
/// `output` item. A response with neither is returned as pretty-printed JSON
/// so the caller still sees what came back.
pub fn extract_text(response: &Value) -> String {
    if let Some(text) = response.get("output_text").and_then(Value::as_str) {
        return text.to_owned();
    }

    if let Some(items) = response.get("output").and_then(Value::as_array) {
        return items
            .iter()
            .filter_map(item_text)
            .collect::<Vec<_>>()
            .join("\n");
    }

    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
}

fn item_text(item: &Value) -> Option<String> {
    let parts = item.get("content").and_then(Value::as_array)?;

    let text = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n");

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn output_text_wins() {
        let response = json!({"output_text": "hello", "output": [{"content": [{"text": "ignored"}]}]});
        assert_eq!(extract_text(&response), "hello");
    }

    #[test]
    fn joins_content_parts() {
        let response = json!({"output": [{"content": [{"text": "a"}, {"text": "b"}]}]});
        assert_eq!(extract_text(&response), "a\nb");
    }

    #[test]
    fn skips_items_and_parts_without_text() {
        let response = json!({
            "output": [
                {"type": "web_search_call", "status": "completed"},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "first"},
                    {"type": "refusal", "refusal": "no"},
                    {"type": "output_text", "text": 3}
                ]},
                {"type": "message", "content": []},
                {"type": "message", "content": [{"type": "output_text", "text": "second"}]}
            ]
        });
        assert_eq!(extract_text(&response), "first\nsecond");
    }

    #[test]
    fn output_without_text_is_empty() {
        let response = json!({"output": [{"type": "reasoning", "summary": []}]});
        assert_eq!(extract_text(&response), "");
    }

    #[test]
    fn unrecognized_shape_is_dumped() {
        let response = json!({"id": "resp_1", "status": "incomplete"});
        let text = extract_text(&response);
        assert!(!text.is_empty());
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), response);
    }

    #[test]
    fn non_string_output_text_falls_through() {
        let response = json!({"output_text": null, "output": [{"content": [{"text": "x"}]}]});
        assert_eq!(extract_text(&response), "x");
    }
}
