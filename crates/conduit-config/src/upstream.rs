use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default `OpenAI` API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for the downstream Responses API
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// API base URL; `/responses` and `/models` are appended
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// API key, takes precedence over the environment
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Sent as `OpenAI-Organization` when set
    #[serde(default)]
    pub organization: Option<String>,
    /// Sent as `OpenAI-Project` when set
    #[serde(default)]
    pub project: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            organization: None,
            project: None,
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default URL")
}
