use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse JSON config: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse TOML config: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Provider credentials and region, read once at startup.
///
/// JSON files may use the camel-case keys of an SDK `config.json`
/// (`accessKeyId`, `secretAccessKey`, ...); TOML files use snake_case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, alias = "accessKeyId")]
    pub access_key_id: Option<String>,
    #[serde(default, alias = "secretAccessKey")]
    pub secret_access_key: Option<String>,
    #[serde(default, alias = "sessionToken")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
}

impl ProviderConfig {
    /// Load from `path`, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(_), None) => Err(ConfigError::Invalid(
                "access_key_id is set but secret_access_key is missing".into(),
            )),
            (None, Some(_)) => Err(ConfigError::Invalid(
                "secret_access_key is set but access_key_id is missing".into(),
            )),
            _ if self.session_token.is_some() && self.access_key_id.is_none() => Err(
                ConfigError::Invalid("session_token requires access_key_id".into()),
            ),
            _ => Ok(()),
        }
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}
