//! Public surface for the slay relay.
//!
//! Re-exports the building blocks and holds the startup helpers the `slay`
//! binary shares with tests.

/// Re-export for convenience.
pub use slay_rs_config as config;
/// Re-export for convenience.
pub use slay_rs_gallery as gallery;
pub use slay_rs_server as server;
/// Re-export for convenience.
pub use slay_rs_upstream as upstream;

use log::{debug, error, info};
use slay_rs_config::{
    ConfigError, EnvOverrides, LayeredConfigOptions, SlayConfig, apply_env_overrides,
};

/// Listener overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[inline]
/// Initialize `env_logger`, honoring `RUST_LOG` and defaulting to `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Log panics from any thread before the default hook runs.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        error!("panic: {panic}");
        previous(panic);
    }));
}

/// Resolve the effective config: layered files, then environment, then flags.
pub fn load_config(
    options: LayeredConfigOptions,
    env: &EnvOverrides,
    cli: &CliOverrides,
) -> Result<SlayConfig, ConfigError> {
    let layered = SlayConfig::load_layered_with_options(options)?;
    debug!("config layers loaded (layers={})", layered.layers.len());
    let mut config = layered.config;
    apply_env_overrides(&mut config, env)?;
    if let Some(host) = cli.host.as_ref() {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;
    info!(
        "effective config resolved (bind={}, capacity={}, upstream_configured={})",
        config.server.bind_address(),
        config.gallery.capacity,
        config.upstream.has_api_key()
    );
    Ok(config)
}
