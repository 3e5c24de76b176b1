//! Liquidation event relay - entry point.
//!
//! Subscribes to one forced-order stream and forwards qualifying
//! liquidations to a webhook. Missing required configuration is fatal
//! before any connection is opened.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

/// Liquidation event relay
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Stream symbol override (also LIQRELAY_SYMBOL)
    #[arg(short, long)]
    symbol: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any WS connections)
    liqrelay_ws::init_crypto();

    let args = Args::parse();

    liqrelay_telemetry::init_logging()?;

    info!("Starting liqrelay v{}", env!("CARGO_PKG_VERSION"));

    let config = match liqrelay_bot::AppConfig::from_env(args.symbol) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let app = liqrelay_bot::Application::new(config)?;

    if let Err(e) = app.run().await {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }

    Ok(())
}
