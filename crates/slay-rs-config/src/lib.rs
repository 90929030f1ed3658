//! Config for the slay relay: the JSON5 schema, the layered loader, and
//! environment overrides applied on top of it.

mod env;
mod error;
mod loader;
mod model;

pub use env::{EnvOverrides, apply_env_overrides};
pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
pub use model::*;
