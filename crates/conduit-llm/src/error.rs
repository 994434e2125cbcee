use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// A single rejected argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path to the offending value, e.g. `tools[1].name`
    pub path: String,
    /// Human-readable explanation
    pub reason: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Tool arguments did not match the declared schema
///
/// Violations are reported in declaration order so the same input always
/// yields the same message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid arguments: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new(path, reason)],
        }
    }

    /// First offending path, reported as the error's parameter
    pub fn first_path(&self) -> Option<&str> {
        self.violations.first().map(|v| v.path.as_str())
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Arguments were well-formed but cannot produce a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// None of the content fields was supplied
    #[error("no content provided: supply one of `input`, `messages` or `prompt`")]
    MissingContent,

    /// `messages` was supplied but empty, with no other content field
    #[error("`messages` must contain at least one message (or use `input` or `prompt` instead)")]
    EmptyMessages,
}

/// The Responses API rejected or failed a request
#[derive(Debug, Clone, Default, Error)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status, absent when no response was received
    pub status: Option<u16>,
    /// API error code, e.g. `invalid_value`
    pub code: Option<String>,
    /// Offending request parameter named by the API
    pub param: Option<String>,
    /// API error type, e.g. `invalid_request_error`
    pub kind: Option<String>,
    pub message: String,
    /// Raw error payload as returned
    pub details: Option<Value>,
}

impl UpstreamError {
    /// Error built from a status alone, for bodies that carry no error object
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Any failure of a tool invocation
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// No API key was found at startup
    #[error("no API key configured: set upstream.api_key in conduit.toml or the OPENAI_API_KEY environment variable")]
    MissingApiKey,

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

/// Coarse classification of a [`BridgeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Normalization,
    Upstream,
    Unknown,
}

impl BridgeError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Normalization(_) => ErrorKind::Normalization,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::MissingApiKey | Self::Unknown(_) => ErrorKind::Unknown,
        }
    }
}
