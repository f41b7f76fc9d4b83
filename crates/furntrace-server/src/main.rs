//! Entry point for the furntrace HTTP server.

use std::path::PathBuf;

use clap::Parser;
use furntrace::config::{load_or_default, validate_config};
use furntrace::{telemetry, Database};
use furntrace_server::{serve, AppState};

/// Command-line arguments for the furntrace server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file. Searched for when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level or filter directive; overrides the config file.
    #[arg(short, long)]
    log_level: Option<String>,

    /// Port to listen on; overrides the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    validate_config(&config)?;
    telemetry::init(&config.logging)?;

    tracing::info!("Starting furntrace v{}", env!("CARGO_PKG_VERSION"));

    let db_path = config
        .database
        .resolved_path()
        .ok_or("no database path configured and no home directory to default to")?;
    let db = Database::open(&db_path, config.database.busy_timeout())?;

    serve(AppState::new(db, config), shutdown_signal()).await?;

    tracing::info!("Stopped furntrace");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
