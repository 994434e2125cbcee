//! Programmatic configuration builder for integration tests

use conduit_config::{ApiKey, ApiKeySource, Config, UnknownFieldPolicy};
use secrecy::SecretString;

use super::mock_api::TEST_KEY;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from built-in defaults
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Point the upstream at a mock backend
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.upstream.base_url = base_url.parse().expect("valid URL");
        self
    }

    /// Reject undeclared tool arguments
    pub fn with_strict_fields(mut self) -> Self {
        self.config.validation.unknown_fields = UnknownFieldPolicy::Strict;
        self
    }

    /// Restrict `model` to a closed list
    pub fn with_allowed_models(mut self, models: &[&str]) -> Self {
        self.config.validation.allowed_models = models.iter().map(|&m| m.to_owned()).collect();
        self
    }

    /// Change the default `list_models` prefix
    pub fn with_models_prefix(mut self, prefix: &str) -> Self {
        self.config.defaults.models_prefix = prefix.to_owned();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Key the mock backend accepts
pub fn test_key() -> ApiKey {
    ApiKey::from_secret(SecretString::from(TEST_KEY), ApiKeySource::Environment("OPENAI_API_KEY"))
}

/// Key the mock backend rejects
pub fn wrong_key() -> ApiKey {
    ApiKey::from_secret(SecretString::from("sk-wrong"), ApiKeySource::Environment("OPENAI_API_KEY"))
}
