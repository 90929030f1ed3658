//! Layered JSON5 config.
//!
//! Files are read low to high (system, user, cwd, runtime) and deep-merged.
//! Keys present in the optional requirements file are locked: later layers
//! cannot change them. Each layer is schema-checked on its own so errors name
//! the file they came from.

mod layer_io;
mod merge;
mod schema;
mod utils;


use crate::{ConfigError, SlayConfig};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "slay.json5";
/// Directory under `$HOME` holding the user layer.
const DEFAULT_CONFIG_DIR: &str = ".slay";

/// Result of a layered load.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: SlayConfig,
    /// Layers that were found, requirements first.
    pub layers: Vec<ConfigLayer>,
}

/// Where a layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    Requirements,
    System,
    User,
    Cwd,
    Runtime,
}

impl ConfigLayerSource {
    /// Short name used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::System => "system",
            Self::User => "user",
            Self::Cwd => "cwd",
            Self::Runtime => "runtime",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: Option<PathBuf>,
}

/// File locations consulted by [`SlayConfig::load_layered_with_options`].
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Directory searched for `slay.json5`.
    pub cwd: PathBuf,
    pub system_config_path: Option<PathBuf>,
    pub user_config_path: Option<PathBuf>,
    /// Locked settings.
    pub requirements_path: Option<PathBuf>,
    /// Files from `--config`, applied last and required to exist.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Default locations around `cwd`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            system_config_path: layer_io::system_config_path(),
            user_config_path: layer_io::user_config_path(),
            requirements_path: layer_io::requirements_path(),
            ..Self::isolated(cwd)
        }
    }

    /// Only the cwd and runtime layers; used by tests and sandboxes.
    pub fn isolated(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: None,
            user_config_path: None,
            requirements_path: None,
            runtime_paths: Vec::new(),
        }
    }

    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl SlayConfig {
    /// Load one file with no layering.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config from path: {}", path.display());
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::read(path, err))?;
        let value: Value = json5::from_str(&contents)
            .map_err(|err| ConfigError::parse(path.display().to_string(), err))?;
        config_from_value(value, "config")
    }

    /// Load from an in-memory JSON5 document.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value =
            json5::from_str(contents).map_err(|err| ConfigError::parse("config", err))?;
        config_from_value(value, "config")
    }

    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Merge every layer named by `options` into one validated config.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = utils::normalize_path(&options.cwd)?;
        let cwd_file = cwd.join(DEFAULT_CONFIG_FILE);

        let requirements = layer_io::read_optional(
            ConfigLayerSource::Requirements,
            options.requirements_path.as_deref(),
        )?;
        let mut layers: Vec<ConfigLayer> = requirements
            .iter()
            .map(|layer| layer.meta.clone())
            .collect();
        let locked = requirements.map(|layer| layer.value);

        let mut stack = Vec::new();
        let mut seen = HashSet::new();
        let discovered = [
            (ConfigLayerSource::System, options.system_config_path.as_deref()),
            (ConfigLayerSource::User, options.user_config_path.as_deref()),
            (ConfigLayerSource::Cwd, Some(cwd_file.as_path())),
        ];
        for (source, path) in discovered {
            let Some(layer) = layer_io::read_optional(source, path)? else {
                continue;
            };
            let key = layer.meta.path.as_deref().map(utils::unique_path);
            if !seen.insert(key) {
                debug!("{} layer already merged under another source", source.label());
                continue;
            }
            stack.push(layer);
        }
        for path in &options.runtime_paths {
            stack.push(layer_io::read_required(ConfigLayerSource::Runtime, path)?);
        }

        let mut merged = locked.clone().unwrap_or_else(|| Value::Object(Map::new()));
        for layer in stack {
            merge::merge_json_with_constraints(&mut merged, &layer.value, locked.as_ref());
            layers.push(layer.meta);
        }

        let config = config_from_value(merged, "effective")?;
        info!(
            "layered config loaded (cwd={}, layers={})",
            cwd.display(),
            layers.len()
        );
        Ok(LayeredConfig { config, layers })
    }

    /// Cross-field checks serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.gallery.capacity == 0, "gallery.capacity must be at least 1"),
            (
                self.gallery.default_latest == 0,
                "gallery.default_latest must be at least 1",
            ),
            (
                self.server.max_upload_bytes == 0,
                "server.max_upload_bytes must be positive",
            ),
            (
                self.upstream.timeout_secs == 0,
                "upstream.timeout_secs must be positive",
            ),
        ];
        if let Some((_, message)) = checks.into_iter().find(|(failed, _)| *failed) {
            return Err(ConfigError::Invalid(message.to_string()));
        }
        let base_url = self.upstream.base_url.as_str();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "upstream.base_url must be an http(s) URL, got {base_url}"
            )));
        }
        Ok(())
    }
}

struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<SlayConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: SlayConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
