//! Configuration schema for slay.

use serde::{Deserialize, Serialize};

/// Root config for the slay relay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlayConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub styles: StylesConfig,
}

impl SlayConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> SlayConfigBuilder {
        SlayConfigBuilder::new()
    }
}

/// Builder for assembling a `SlayConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct SlayConfigBuilder {
    config: SlayConfig,
}

impl SlayConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: SlayConfig::default(),
        }
    }

    /// Replace the HTTP server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Replace the upstream API configuration.
    pub fn upstream(mut self, upstream: UpstreamConfig) -> Self {
        self.config.upstream = upstream;
        self
    }

    /// Replace the gallery configuration.
    pub fn gallery(mut self, gallery: GalleryConfig) -> Self {
        self.config.gallery = gallery;
        self
    }

    /// Replace the style picker configuration.
    pub fn styles(mut self, styles: StylesConfig) -> Self {
        self.config.styles = styles;
        self
    }

    /// Finalize and return the built `SlayConfig`.
    pub fn build(self) -> SlayConfig {
        self.config
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Upload limit in bytes (10 MiB).
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

/// Cross-origin policy. An empty allow list mirrors any request origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            allow_credentials: default_allow_credentials(),
        }
    }
}

fn default_allow_credentials() -> bool {
    true
}

/// Image generation API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_image_quality")]
    pub image_quality: String,
    #[serde(default = "default_vision_max_tokens")]
    pub vision_max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            vision_model: default_vision_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            image_quality: default_image_quality(),
            vision_max_tokens: default_vision_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_vision_model() -> String {
    "gpt-4o".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_image_quality() -> String {
    "hd".to_string()
}

fn default_vision_max_tokens() -> u32 {
    200
}

fn default_timeout_secs() -> u64 {
    120
}

/// Bounded gallery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_latest")]
    pub default_latest: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            default_latest: default_latest(),
        }
    }
}

fn default_capacity() -> usize {
    50
}

fn default_latest() -> usize {
    10
}

/// Random style selection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StylesConfig {
    /// Fixed seed for reproducible picks; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}
