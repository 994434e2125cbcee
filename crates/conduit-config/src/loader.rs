use std::path::{Path, PathBuf};

use crate::{Config, ReasoningEffort};

/// File name looked up in the working directory and config directories
const CONFIG_FILE_NAME: &str = "conduit.toml";

/// Configuration together with the file it came from
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when no file was found and defaults are in effect
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Find and load the first configuration file that exists
    ///
    /// An explicit path must exist. Otherwise the working directory,
    /// `$XDG_CONFIG_HOME/conduit` and `$HOME/.config/conduit` are tried
    /// in order, and built-in defaults apply when none has a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit path is missing or the chosen file
    /// fails to load
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<LoadedConfig> {
        if let Some(path) = explicit {
            if !path.is_file() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            let config = Self::load(path)?;
            return Ok(LoadedConfig {
                config,
                path: Some(path.to_path_buf()),
            });
        }

        match candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                let config = Self::load(&path)?;
                Ok(LoadedConfig {
                    config,
                    path: Some(path),
                })
            }
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(LoadedConfig::default())
            }
        }
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults contradict the validation profile
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_default_model()?;
        self.validate_default_reasoning()?;
        Ok(())
    }

    fn validate_default_model(&self) -> anyhow::Result<()> {
        let model = self.defaults.model.trim();
        if model.is_empty() {
            anyhow::bail!("defaults.model must not be empty");
        }

        if self.validation.is_closed_model_set() && !self.validation.allowed_models.iter().any(|m| m == model) {
            anyhow::bail!("defaults.model `{model}` is not listed in validation.allowed_models");
        }

        Ok(())
    }

    fn validate_default_reasoning(&self) -> anyhow::Result<()> {
        if self.defaults.reasoning_effort == Some(ReasoningEffort::Minimal) && self.defaults.web_search {
            anyhow::bail!("defaults.reasoning_effort `minimal` cannot be combined with defaults.web_search = true");
        }
        Ok(())
    }
}

/// Implicit config locations, most specific first
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(xdg).join("conduit").join(CONFIG_FILE_NAME));
    }

    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(home).join(".config").join("conduit").join(CONFIG_FILE_NAME));
    }

    paths
}
