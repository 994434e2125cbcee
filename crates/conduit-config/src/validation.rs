use serde::Deserialize;

/// Argument validation profile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// What to do with arguments outside the declared field set
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
    /// Closed set of accepted model ids; empty accepts any string
    #[serde(default)]
    pub allowed_models: Vec<String>,
}

impl ValidationConfig {
    /// Whether `model` is restricted to `allowed_models`
    pub fn is_closed_model_set(&self) -> bool {
        !self.allowed_models.is_empty()
    }
}

/// Handling of undeclared tool arguments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Forward unknown fields to the API untouched
    #[default]
    Permissive,
    /// Reject any unknown field
    Strict,
}

impl UnknownFieldPolicy {
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl std::str::FromStr for UnknownFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown field policy must be `strict` or `permissive`, got `{other}`")),
        }
    }
}
