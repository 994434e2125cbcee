//! MCP tool surface for Conduit

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod diagnostic;
pub mod dispatcher;
pub mod server;

pub use dispatcher::{ListModelsArgs, ToolDispatcher};
pub use server::{ConduitServer, GENERATE_TEXT, LIST_MODELS};
