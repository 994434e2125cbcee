//! HTTP client for the Responses API

use anyhow::Context as _;
use async_trait::async_trait;
use conduit_config::{ApiKey, UpstreamConfig};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{BridgeError, UpstreamError};
use crate::types::CanonicalRequest;

/// Operations the tool surface needs from the downstream API
#[async_trait]
pub trait ResponsesApi: Send + Sync {
    /// Create a response and return the raw result object
    async fn create_response(&self, request: &CanonicalRequest) -> Result<Value, BridgeError>;

    /// Ids of every model visible to the configured key
    async fn list_models(&self) -> Result<Vec<String>, BridgeError>;
}

/// `OpenAI` Responses API over HTTPS
#[derive(Clone)]
pub struct OpenAiResponses {
    http: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    organization: Option<String>,
    project: Option<String>,
}

impl OpenAiResponses {
    /// Build a client from upstream settings and the resolved key
    ///
    /// A missing key is accepted here; every call then fails with
    /// [`BridgeError::MissingApiKey`].
    pub fn new(config: &UpstreamConfig, api_key: &ApiKey) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            api_key: api_key.secret().cloned(),
            organization: config.organization.clone(),
            project: config.project.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, BridgeError> {
        let key = self.api_key.as_ref().ok_or(BridgeError::MissingApiKey)?;

        let mut builder = builder.bearer_auth(key.expose_secret());
        if let Some(organization) = &self.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }
        if let Some(project) = &self.project {
            builder = builder.header("OpenAI-Project", project);
        }

        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<Response, BridgeError> {
        let response = self.authorized(builder)?.send().await.map_err(|e| {
            tracing::error!(endpoint, error = %e, "upstream request failed");
            anyhow::Error::new(e).context(format!("request to {endpoint} failed"))
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(endpoint, status = status.as_u16(), "upstream returned error");

        Err(classify_error(status.as_u16(), status.canonical_reason(), &body).into())
    }
}

#[async_trait]
impl ResponsesApi for OpenAiResponses {
    async fn create_response(&self, request: &CanonicalRequest) -> Result<Value, BridgeError> {
        let builder = self.http.post(self.endpoint("responses")).json(&request.to_body());
        let response = self.send(builder, "responses").await?;
        let status = response.status().as_u16();

        let body: Value = response
            .json()
            .await
            .context("failed to decode responses body")?;

        if let Some(error) = failed_response_error(status, &body) {
            tracing::warn!(status, "response finished with status failed");
            return Err(error.into());
        }

        Ok(body)
    }

    async fn list_models(&self) -> Result<Vec<String>, BridgeError> {
        let builder = self.http.get(self.endpoint("models"));
        let response = self.send(builder, "models").await?;

        let list: ModelList = response
            .json()
            .await
            .context("failed to decode model list")?;

        Ok(list.data.into_iter().map(|model| model.id).collect())
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Error object as documented for the `OpenAI` API
#[derive(Debug, Deserialize)]
struct ApiErrorObject {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    param: Option<String>,
    code: Option<Value>,
}

impl ApiErrorObject {
    fn into_upstream(self, status: u16, details: Value, fallback: &str) -> UpstreamError {
        UpstreamError {
            status: Some(status),
            code: self.code.and_then(code_string),
            param: self.param,
            kind: self.kind,
            message: self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_owned()),
            details: Some(details),
        }
    }
}

/// Codes are usually strings but some deployments send numbers
fn code_string(code: Value) -> Option<String> {
    match code {
        Value::String(code) => Some(code),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Turn a non-2xx body into an [`UpstreamError`]
fn classify_error(status: u16, reason: Option<&str>, body: &str) -> UpstreamError {
    let fallback = reason.map_or_else(|| format!("HTTP {status}"), |reason| format!("HTTP {status} {reason}"));

    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        let message = if body.trim().is_empty() {
            fallback
        } else {
            format!("{fallback}: {}", body.trim())
        };
        return UpstreamError::from_status(status, message);
    };

    let error_object = parsed.get("error").cloned().unwrap_or_else(|| parsed.clone());
    match serde_json::from_value::<ApiErrorObject>(error_object.clone()) {
        Ok(api_error) => api_error.into_upstream(status, error_object, &fallback),
        Err(_) => UpstreamError {
            details: Some(parsed),
            ..UpstreamError::from_status(status, fallback)
        },
    }
}

/// A 2xx body can still report a failed generation
fn failed_response_error(status: u16, body: &Value) -> Option<UpstreamError> {
    if body.get("status").and_then(Value::as_str) != Some("failed") {
        return None;
    }

    let error_object = body.get("error").filter(|e| e.is_object())?.clone();
    let api_error = serde_json::from_value::<ApiErrorObject>(error_object.clone()).ok()?;
    Some(api_error.into_upstream(status, error_object, "response failed"))
}
