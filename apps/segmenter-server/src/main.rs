#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod logging;
mod server;
mod signals;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, ServerSettings};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Segment relay server - splits inbound text and relays segments downstream
#[derive(Parser)]
#[command(name = "segmenter-server")]
#[command(about = "Segment relay server - splits inbound text and relays segments downstream")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (SEGMENTER_*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init_logging(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let settings = config.validate()?;
            run_server(settings).await
        }
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(settings: ServerSettings) -> Result<()> {
    tracing::info!("Segment relay starting");

    let router = server::build_router(&settings)?;
    let cancel = CancellationToken::new();
    signals::cancel_on_signal(cancel.clone());

    server::serve(&settings, router, cancel).await?;
    tracing::info!("Segment relay stopped");
    Ok(())
}
