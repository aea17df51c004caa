//! Tideline - server for the marketing site
//!
//! # Commands
//! - `tideline serve` - serve the site (default)
//! - `tideline check` - validate configuration and print it as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tideline_site::{SiteConfig, SiteResources, build_ingress, init_tracing};

#[derive(Parser)]
#[command(name = "tideline")]
#[command(author, version, about = "Server-rendered site backed by a headless CMS")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "TIDELINE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config and HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site
    Serve,

    /// Validate configuration and print the effective values
    Check,
}

fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = SiteConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading configuration".to_string(),
    })?;

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate().context("validating command-line overrides")?;
    Ok(config)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "cannot listen for Ctrl+C, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

async fn serve(config: SiteConfig) -> Result<()> {
    init_tracing();
    tracing::info!(cms = %config.cms.url, addr = %config.bind_addr(), "starting tideline");

    let ingress = build_ingress(&config);
    let resources = SiteResources::from_config(config).context("creating CMS client")?;
    ingress
        .run_until(resources, shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("server stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Check => {
            let shown = config
                .to_redacted_toml()
                .context("serializing configuration")?;
            println!("{shown}");
            Ok(())
        }
    }
}
