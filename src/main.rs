use anyhow::Result;
use tryon_relay::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    if let Err(e) = config::validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting virtual try-on relay with log level: {}", log_level);

    server::run(config).await?;

    Ok(())
}
