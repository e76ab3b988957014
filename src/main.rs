use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use network_rca_client::{
    config::{Config, LogFormat, ServiceConfig},
    console::Console,
    diagnostics::DiagnosticsClient,
    workflow::WorkflowController,
};

/// Interactive client for the network diagnostics and RCA service
#[derive(Debug, Parser)]
#[command(name = "network-rca", version, about)]
struct Cli {
    /// Base URL of the diagnostics service (overrides RCA_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Directory reports are exported to (overrides RCA_EXPORT_DIR)
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(api_url) = cli.api_url {
        config.service = ServiceConfig::new(api_url)?;
    }
    if let Some(export_dir) = cli.export_dir {
        config.export.directory = export_dir;
    }

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Network RCA client starting..."
    );

    let client = match DiagnosticsClient::new(&config.service, config.request.clone()) {
        Ok(c) => {
            info!(base_url = %config.service.base_url, "Diagnostics client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize diagnostics client");
            return Err(e.into());
        }
    };

    let console = Console::new(WorkflowController::new(client), config.export.directory.clone());

    if let Err(e) = console.run().await {
        error!(error = %e, "Console error");
        return Err(e.into());
    }

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
