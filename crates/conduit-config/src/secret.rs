//! API key resolution
//!
//! The key is read once at startup. A missing key is not an error here;
//! operations that reach the API fail individually instead.

use std::fmt;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::LoadedConfig;

/// Environment variable consulted when the config file has no key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Where the API key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// `upstream.api_key` in this file
    ConfigFile(PathBuf),
    /// The named environment variable
    Environment(&'static str),
    /// No key anywhere
    Missing,
}

impl fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFile(path) => write!(f, "config file {}", path.display()),
            Self::Environment(var) => write!(f, "environment variable {var}"),
            Self::Missing => f.write_str("none"),
        }
    }
}

/// Resolved API key plus its provenance
#[derive(Debug, Clone)]
pub struct ApiKey {
    secret: Option<SecretString>,
    source: ApiKeySource,
}

impl ApiKey {
    /// Resolve from the loaded config, falling back to [`API_KEY_ENV`]
    pub fn resolve(loaded: &LoadedConfig) -> Self {
        if let Some(secret) = loaded.config.upstream.api_key.clone()
            && !secret.expose_secret().trim().is_empty()
            && let Some(path) = &loaded.path
        {
            return Self {
                secret: Some(secret),
                source: ApiKeySource::ConfigFile(path.clone()),
            };
        }

        match std::env::var(API_KEY_ENV) {
            Ok(value) if !value.trim().is_empty() => Self {
                secret: Some(SecretString::from(value)),
                source: ApiKeySource::Environment(API_KEY_ENV),
            },
            _ => Self::missing(),
        }
    }

    /// A key that was never found
    pub const fn missing() -> Self {
        Self {
            secret: None,
            source: ApiKeySource::Missing,
        }
    }

    /// Wrap a known key, mainly for tests and embedding
    pub fn from_secret(secret: SecretString, source: ApiKeySource) -> Self {
        Self {
            secret: Some(secret),
            source,
        }
    }

    pub const fn secret(&self) -> Option<&SecretString> {
        self.secret.as_ref()
    }

    pub const fn source(&self) -> &ApiKeySource {
        &self.source
    }
}
