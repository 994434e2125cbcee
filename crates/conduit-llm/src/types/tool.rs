//! Tool declarations forwarded to the Responses API

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::JsonObject;

/// Current type tag of the built-in web search tool
pub const WEB_SEARCH_TYPE: &str = "web_search_preview";

/// Older tag still sent by some clients for the same tool
const LEGACY_WEB_SEARCH_TYPE: &str = "web_search";

const FUNCTION_TYPE: &str = "function";
const FILE_SEARCH_TYPE: &str = "file_search";
const REMOTE_TYPE: &str = "mcp";

/// A tool the model may use, one variant per tool kind
#[derive(Debug, Clone, PartialEq)]
pub enum ToolDeclaration {
    /// Caller-defined function
    Function(FunctionTool),
    /// Built-in web search
    WebSearch(WebSearchTool),
    /// Built-in retrieval over vector stores
    FileSearch(FileSearchTool),
    /// Tools served by a remote MCP server
    Remote(RemoteTool),
    /// Any other built-in, forwarded as given
    Builtin(BuiltinTool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the function arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Web search options (`user_location`, `search_context_size`, ...) are kept opaque
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSearchTool {
    #[serde(flatten)]
    pub options: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSearchTool {
    pub vector_store_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_results: Option<u32>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTool {
    pub server_label: String,
    pub server_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_approval: Option<Value>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinTool {
    /// The `type` tag
    pub kind: String,
    /// Remaining keys
    pub options: JsonObject,
}

/// Why a tool object was rejected, relative to the tool entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolShapeError {
    /// Key inside the tool object, empty for the object itself
    pub field: &'static str,
    pub reason: String,
}

impl ToolShapeError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl ToolDeclaration {
    /// Built-in web search with no options
    pub fn web_search() -> Self {
        Self::WebSearch(WebSearchTool::default())
    }

    /// Expand a bare string like `"web_search"` into a declaration
    ///
    /// The name is trimmed, lowercased and has `-` and spaces folded to `_`.
    /// Every spelling of web search maps to [`WEB_SEARCH_TYPE`]; anything
    /// else becomes a built-in tagged with the folded name.
    pub fn from_shorthand(name: &str) -> Self {
        let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");

        match key.as_str() {
            "web_search" | "web_search_preview" | "websearch" | "web" => Self::web_search(),
            "code_interpreter" => {
                let mut options = JsonObject::new();
                options.insert("container".to_owned(), serde_json::json!({ "type": "auto" }));
                Self::Builtin(BuiltinTool {
                    kind: key,
                    options,
                })
            }
            _ => Self::Builtin(BuiltinTool {
                kind: key,
                options: JsonObject::new(),
            }),
        }
    }

    /// Whether a shorthand string needs more than a type tag to be usable
    pub fn shorthand_requires_object(name: &str) -> Option<&'static str> {
        match name.trim() {
            FUNCTION_TYPE => Some("a function tool needs an object with `name`"),
            FILE_SEARCH_TYPE => Some("a file_search tool needs an object with `vector_store_ids`"),
            REMOTE_TYPE => Some("an mcp tool needs an object with `server_label` and `server_url`"),
            _ => None,
        }
    }

    /// Parse a tool object, checking the fields its kind requires
    ///
    /// The legacy web search tag is rewritten to the current one.
    pub fn from_object(mut object: JsonObject) -> Result<Self, ToolShapeError> {
        let kind = match object.remove("type") {
            Some(Value::String(kind)) if !kind.trim().is_empty() => kind,
            Some(_) => return Err(ToolShapeError::new("type", "must be a non-empty string")),
            None => return Err(ToolShapeError::new("type", "is required")),
        };

        match kind.as_str() {
            FUNCTION_TYPE => {
                require_string(&object, "name")?;
                decode(object).map(Self::Function)
            }
            WEB_SEARCH_TYPE | LEGACY_WEB_SEARCH_TYPE => Ok(Self::WebSearch(WebSearchTool { options: object })),
            FILE_SEARCH_TYPE => {
                match object.get("vector_store_ids") {
                    Some(Value::Array(ids)) if !ids.is_empty() && ids.iter().all(Value::is_string) => {}
                    Some(_) => {
                        return Err(ToolShapeError::new(
                            "vector_store_ids",
                            "must be a non-empty array of strings",
                        ));
                    }
                    None => return Err(ToolShapeError::new("vector_store_ids", "is required")),
                }
                decode(object).map(Self::FileSearch)
            }
            REMOTE_TYPE => {
                require_string(&object, "server_label")?;
                require_string(&object, "server_url")?;
                decode(object).map(Self::Remote)
            }
            _ => Ok(Self::Builtin(BuiltinTool { kind, options: object })),
        }
    }

    /// The `type` tag sent to the API
    pub fn kind(&self) -> &str {
        match self {
            Self::Function(_) => FUNCTION_TYPE,
            Self::WebSearch(_) => WEB_SEARCH_TYPE,
            Self::FileSearch(_) => FILE_SEARCH_TYPE,
            Self::Remote(_) => REMOTE_TYPE,
            Self::Builtin(tool) => &tool.kind,
        }
    }

    pub const fn is_web_search(&self) -> bool {
        matches!(self, Self::WebSearch(_))
    }
}

fn require_string(object: &JsonObject, field: &'static str) -> Result<(), ToolShapeError> {
    match object.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(ToolShapeError::new(field, "must be a non-empty string")),
        None => Err(ToolShapeError::new(field, "is required")),
    }
}

fn decode<T: serde::de::DeserializeOwned>(object: JsonObject) -> Result<T, ToolShapeError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| ToolShapeError::new("", e.to_string()))
}

impl Serialize for ToolDeclaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            Self::Function(tool) => serde_json::to_value(tool),
            Self::WebSearch(tool) => serde_json::to_value(tool),
            Self::FileSearch(tool) => serde_json::to_value(tool),
            Self::Remote(tool) => serde_json::to_value(tool),
            Self::Builtin(tool) => Ok(Value::Object(tool.options.clone())),
        }
        .map_err(S::Error::custom)?;

        let mut object = match body {
            Value::Object(object) => object,
            _ => JsonObject::new(),
        };
        object.insert("type".to_owned(), Value::String(self.kind().to_owned()));
        object.serialize(serializer)
    }
}
