use std::fmt;

use serde::{Deserialize, Serialize};

/// Model used when a call does not name one
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Prefix used by `list_models` when the caller gives none
pub const DEFAULT_MODELS_PREFIX: &str = "gpt-5";

/// Defaults injected into `generate_text` arguments
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Reasoning effort, `None` leaves reasoning unset
    #[serde(default = "default_reasoning_effort")]
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Whether built-in web search is enabled
    #[serde(default = "default_true")]
    pub web_search: bool,
    /// Model id prefix for `list_models`
    #[serde(default = "default_models_prefix")]
    pub models_prefix: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            reasoning_effort: default_reasoning_effort(),
            web_search: true,
            models_prefix: default_models_prefix(),
        }
    }
}

/// How much internal reasoning the model spends before answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    /// Every accepted value, in ascending order of effort
    pub const ALL: [Self; 4] = [Self::Minimal, Self::Low, Self::Medium, Self::High];

    /// Wire name of this effort level
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a wire name
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|effort| effort.as_str() == value)
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

#[allow(clippy::unnecessary_wraps)]
const fn default_reasoning_effort() -> Option<ReasoningEffort> {
    Some(ReasoningEffort::Medium)
}

const fn default_true() -> bool {
    true
}

fn default_models_prefix() -> String {
    DEFAULT_MODELS_PREFIX.to_owned()
}
