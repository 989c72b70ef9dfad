//! Playdeck Server Binary

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use playdeck_config::{ConfigLoader, PlaydeckConfig, Validatable};
use playdeck_server::Server;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address, overriding the configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Server port, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .load(cli.config.as_ref())
        .context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, &cli)?;

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let server = Server::new(config).await?;
    server.start().await
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut PlaydeckConfig, cli: &Cli) -> Result<()> {
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config
        .server
        .validate()
        .context("Invalid server options")?;
    Ok(())
}
