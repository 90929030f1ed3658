//! Schema validation helpers for slay JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &["$schema", "server", "upstream", "gallery", "styles"],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("server") {
        validate_server(value, layer, "server")?;
    }
    if let Some(value) = map.get("upstream") {
        validate_upstream(value, layer, "upstream")?;
    }
    if let Some(value) = map.get("gallery") {
        validate_gallery(value, layer, "gallery")?;
    }
    if let Some(value) = map.get("styles") {
        validate_styles(value, layer, "styles")?;
    }
    Ok(())
}

/// Validate the "server" block.
fn validate_server(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["host", "port", "max_upload_bytes", "cors"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("host") {
        expect_string(value, layer, &join_path(path, "host"))?;
    }
    if let Some(value) = map.get("port") {
        expect_port(value, layer, &join_path(path, "port"))?;
    }
    if let Some(value) = map.get("max_upload_bytes") {
        expect_u64(value, layer, &join_path(path, "max_upload_bytes"))?;
    }
    if let Some(value) = map.get("cors") {
        let cors_path = join_path(path, "cors");
        let cors = expect_object(value, layer, &cors_path)?;
        ensure_allowed_keys(
            cors,
            &["allow_origins", "allow_credentials"],
            layer,
            &cors_path,
        )?;
        if let Some(value) = cors.get("allow_origins") {
            validate_string_array(value, layer, &join_path(&cors_path, "allow_origins"))?;
        }
        if let Some(value) = cors.get("allow_credentials") {
            expect_bool(value, layer, &join_path(&cors_path, "allow_credentials"))?;
        }
    }
    Ok(())
}

/// Validate the "upstream" block.
fn validate_upstream(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "base_url",
            "api_key",
            "vision_model",
            "image_model",
            "image_size",
            "image_quality",
            "vision_max_tokens",
            "timeout_secs",
        ],
        layer,
        path,
    )?;
    for key in [
        "base_url",
        "vision_model",
        "image_model",
        "image_size",
        "image_quality",
    ] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("api_key")
        && !value.is_null()
    {
        expect_string(value, layer, &join_path(path, "api_key"))?;
    }
    if let Some(value) = map.get("image_size") {
        validate_image_size(value, layer, &join_path(path, "image_size"))?;
    }
    for key in ["vision_max_tokens", "timeout_secs"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

/// Validate the "gallery" block.
fn validate_gallery(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["capacity", "default_latest"], layer, path)?;
    for key in ["capacity", "default_latest"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

/// Validate the "styles" block.
fn validate_styles(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["seed"], layer, path)?;
    if let Some(value) = map.get("seed")
        && !value.is_null()
    {
        expect_u64(value, layer, &join_path(path, "seed"))?;
    }
    Ok(())
}

/// Image sizes look like `1024x1024`.
fn validate_image_size(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Some(size) = value.as_str() else {
        return Err(invalid_field(layer, path, "expected string"));
    };
    let valid = size
        .split_once('x')
        .is_some_and(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok());
    if valid {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected <width>x<height>"))
    }
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a non-negative integer.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn expect_port(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value.as_u64() {
        Some(port) if port <= u64::from(u16::MAX) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected port number")),
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(entries) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    for (idx, entry) in entries.iter().enumerate() {
        if !entry.is_string() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
