use clap::Parser;
use eyre::Result;
use tracing::{error, info};

use leadhook::{config::AppConfig, webhook::start_webhook_server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting lead-capture webhook bot");

    // Load configuration from flags and environment
    let config = AppConfig::parse();

    // Validate configuration
    config.validate()?;

    info!(
        port = config.port,
        session_ttl_secs = config.session_ttl_secs,
        sweep_interval_secs = config.sweep_interval_secs,
        "Loaded and validated configuration"
    );

    // Set up graceful shutdown
    let shutdown = tokio::signal::ctrl_c();
    let server = start_webhook_server(config);

    tokio::select! {
        _ = shutdown => {
            info!("Received shutdown signal, stopping gracefully...");
        }
        result = server => {
            if let Err(e) = result {
                error!("Webhook server error: {}", e);
                return Err(e);
            }
        }
    }

    info!("Shutdown complete");
    Ok(())
}
