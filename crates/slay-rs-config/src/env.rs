//! Environment variable overrides applied after file layers.

use crate::{ConfigError, SlayConfig};
use log::debug;

/// Port to listen on.
const ENV_PORT: &str = "PORT";
/// Interface to bind.
const ENV_HOST: &str = "HOST";
/// Upstream API key.
const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Upstream API base URL.
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// Raw override values read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub host: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            port: read(ENV_PORT),
            host: read(ENV_HOST),
            api_key: read(ENV_API_KEY),
            base_url: read(ENV_BASE_URL),
        }
    }
}

/// Apply environment overrides on top of a loaded config.
pub fn apply_env_overrides(
    config: &mut SlayConfig,
    overrides: &EnvOverrides,
) -> Result<(), ConfigError> {
    if let Some(port) = &overrides.port {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidField {
                path: format!("env:{ENV_PORT}"),
                message: format!("expected port number, got {port}"),
            })?;
        debug!("port overridden from environment (port={})", config.server.port);
    }
    if let Some(host) = &overrides.host {
        config.server.host = host.trim().to_string();
    }
    if let Some(api_key) = &overrides.api_key {
        config.upstream.api_key = Some(api_key.trim().to_string());
        debug!("upstream api key taken from environment");
    }
    if let Some(base_url) = &overrides.base_url {
        config.upstream.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    config.validate()
}
