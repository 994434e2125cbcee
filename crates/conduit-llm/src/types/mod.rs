//! Request types on either side of normalization

mod args;
mod request;
mod tool;

pub use args::{GenerateArgs, ToolSpec};
pub use request::{CanonicalRequest, Input, Reasoning, TextOptions, Verbosity};
pub use tool::{
    BuiltinTool, FileSearchTool, FunctionTool, RemoteTool, ToolDeclaration, ToolShapeError, WEB_SEARCH_TYPE,
    WebSearchTool,
};

/// A JSON object with string keys
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
