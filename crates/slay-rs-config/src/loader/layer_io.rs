//! Reading layer files and locating the default ones.

use super::{ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, LoadedLayer};
use super::schema;
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SYSTEM_DIR: &str = "/etc/slay";
const REQUIREMENTS_FILE: &str = "requirements.json5";

/// Read a layer, treating a missing file as "no layer".
pub(super) fn read_optional(
    source: ConfigLayerSource,
    path: Option<&Path>,
) -> Result<Option<LoadedLayer>, ConfigError> {
    match path {
        Some(path) => read_layer(source, path, false),
        None => Ok(None),
    }
}

/// Read a layer that must exist.
pub(super) fn read_required(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<LoadedLayer, ConfigError> {
    read_layer(source, path, true)?.ok_or_else(|| {
        ConfigError::read(path, std::io::Error::from(ErrorKind::NotFound))
    })
}

fn read_layer(
    source: ConfigLayerSource,
    path: &Path,
    required: bool,
) -> Result<Option<LoadedLayer>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => {
            debug!("no {} layer at {}", source.label(), path.display());
            return Ok(None);
        }
        Err(err) => return Err(ConfigError::read(path, err)),
    };
    let origin = format!("{}({})", source.label(), path.display());
    let value: Value =
        json5::from_str(&contents).map_err(|err| ConfigError::parse(origin.as_str(), err))?;
    schema::validate_layer_schema(&value, &origin)?;
    debug!("read {origin} (bytes={})", contents.len());
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: Some(path.to_path_buf()),
        },
        value,
    }))
}

/// System-wide layers only exist on Unix.
pub(super) fn system_config_path() -> Option<PathBuf> {
    cfg!(unix).then(|| Path::new(SYSTEM_DIR).join(DEFAULT_CONFIG_FILE))
}

pub(super) fn requirements_path() -> Option<PathBuf> {
    cfg!(unix).then(|| Path::new(SYSTEM_DIR).join(REQUIREMENTS_FILE))
}

/// `~/.slay/slay.json5`, when a home directory is known.
pub(super) fn user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
    )
}
