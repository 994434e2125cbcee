//! Request pipeline for the Conduit tool bridge
//!
//! Validates loosely shaped `generate_text` arguments, normalizes them into a
//! single canonical Responses API request, sends it, and flattens the reply
//! back into text.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod schema;
pub mod types;

pub use client::{OpenAiResponses, ResponsesApi};
pub use error::{BridgeError, ErrorKind, FieldViolation, NormalizationError, UpstreamError, ValidationError};
pub use extract::extract_text;
pub use normalize::normalize;
pub use schema::Validator;
pub use types::{CanonicalRequest, GenerateArgs, JsonObject};
