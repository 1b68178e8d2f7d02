//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Base URL of the public Scaleway API.
pub const DEFAULT_API_URL: &str = "https://api.scaleway.com";

/// Client configuration derived from environment variables, configuration
/// files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "SCW")]
pub struct BaremetalConfig {
    /// Secret key sent as `X-Auth-Token`. This value is required.
    pub secret_key: String,
    /// Root URL the transport prefixes every request path with.
    #[ortho_config(default = "https://api.scaleway.com".to_owned())]
    pub api_url: String,
    /// Zone used when a request leaves its zone empty.
    pub default_zone: Option<String>,
    /// Organization used by create-style requests that omit one.
    pub default_organization_id: Option<String>,
    /// Page size used by list requests that omit one.
    pub default_page_size: Option<u32>,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl BaremetalConfig {
    /// Creates a configuration holding only a secret key and the public API URL.
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_url: DEFAULT_API_URL.to_owned(),
            default_zone: None,
            default_organization_id: None,
            default_page_size: None,
        }
    }

    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to [baremetal] in baremetal.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    fn non_blank(value: Option<&String>) -> Option<String> {
        value
            .map(|raw| raw.trim())
            .filter(|trimmed| !trimmed.is_empty())
            .map(str::to_owned)
    }

    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, environment variables, and CLI flags in
    /// that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("baremetal")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Default zone, with blank values treated as unset.
    #[must_use]
    pub fn zone(&self) -> Option<String> {
        Self::non_blank(self.default_zone.as_ref())
    }

    /// Default organization identifier, with blank values treated as unset.
    #[must_use]
    pub fn organization_id(&self) -> Option<String> {
        Self::non_blank(self.default_organization_id.as_ref())
    }

    /// Default page size; zero is treated as unset.
    #[must_use]
    pub fn page_size(&self) -> Option<u32> {
        self.default_page_size.filter(|size| *size > 0)
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values via environment variables or
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.secret_key,
            &FieldMetadata::new("Scaleway API secret key", "SCW_SECRET_KEY", "secret_key"),
        )?;
        Self::require_field(
            &self.api_url,
            &FieldMetadata::new("API base URL", "SCW_API_URL", "api_url"),
        )?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
