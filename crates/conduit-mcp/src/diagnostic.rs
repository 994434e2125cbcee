use std::fmt::Write as _;

use conduit_llm::{BridgeError, ErrorKind};

/// Stable label for each error kind
pub const fn error_type(error: &BridgeError) -> &'static str {
    match error.kind() {
        ErrorKind::Validation => "validation_error",
        ErrorKind::Normalization => "normalization_error",
        ErrorKind::Upstream => "upstream_error",
        ErrorKind::Unknown => "unknown_error",
    }
}

/// One-line failure text returned to the caller
///
/// Carries the message plus status, code, parameter and raw details when the
/// error has them. Line breaks inside any part are folded into spaces.
pub fn diagnostic(error: &BridgeError) -> String {
    let mut line = format!("{}: {}", error_type(error), message(error));

    let mut attributes = Vec::new();
    let mut details = None;

    match error {
        BridgeError::Upstream(upstream) => {
            if let Some(status) = upstream.status {
                attributes.push(format!("status={status}"));
            }
            if let Some(code) = &upstream.code {
                attributes.push(format!("code={code}"));
            }
            if let Some(param) = &upstream.param {
                attributes.push(format!("param={param}"));
            }
            if let Some(kind) = &upstream.kind {
                attributes.push(format!("type={kind}"));
            }
            details = upstream.details.as_ref();
        }
        BridgeError::Validation(validation) => {
            if let Some(path) = validation.first_path() {
                attributes.push(format!("param={path}"));
            }
        }
        BridgeError::Normalization(_) | BridgeError::MissingApiKey | BridgeError::Unknown(_) => {}
    }

    if !attributes.is_empty() {
        let _ = write!(line, " [{}]", attributes.join(" "));
    }

    if let Some(details) = details {
        let _ = write!(line, " details={details}");
    }

    single_line(&line)
}

/// Error message including its `anyhow` context chain
fn message(error: &BridgeError) -> String {
    match error {
        BridgeError::Unknown(inner) => format!("{inner:#}"),
        other => other.to_string(),
    }
}

fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
