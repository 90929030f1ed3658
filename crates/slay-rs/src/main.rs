//! `slay` binary: load config and run the HTTP relay.

use anyhow::Context;
use clap::Parser;
use log::info;
use slay_rs::config::{EnvOverrides, LayeredConfigOptions};
use slay_rs::server::{AppState, serve};
use slay_rs::{CliOverrides, init_logging, install_panic_hook, load_config};
use std::path::PathBuf;

/// Command-line options for the relay.
#[derive(Parser)]
#[command(name = "slay", version)]
struct Cli {
    /// Extra slay.json5 files applied after the discovered layers
    #[arg(long = "config")]
    configs: Vec<PathBuf>,
    /// Bind host override
    #[arg(long)]
    host: Option<String>,
    /// Bind port override
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    install_panic_hook();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    info!(
        "starting slay (cwd={}, runtime_configs={})",
        cwd.display(),
        cli.configs.len()
    );
    let options = cli
        .configs
        .iter()
        .fold(LayeredConfigOptions::new(&cwd), |options, path| {
            options.with_runtime_path(path)
        });
    let overrides = CliOverrides {
        host: cli.host,
        port: cli.port,
    };
    let config = load_config(options, &EnvOverrides::from_env(), &overrides)
        .context("failed to load config")?;

    let state = AppState::from_config(&config).context("failed to build upstream client")?;
    serve(&config.server, state)
        .await
        .context("server exited with an error")?;
    Ok(())
}
