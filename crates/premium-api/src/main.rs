//! Premium API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p premium-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use premium_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Run the server
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration before tracing so the environment picks the format
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        backend = ?config.ledger.backend,
        "Configuration loaded"
    );

    premium_api::run(config).await?;

    Ok(())
}
