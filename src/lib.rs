pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod store;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
}

/// Install the global `tracing` subscriber. Honors `RUST_LOG`.
/// Calling it again is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Server process entry: logging, configuration, then serve until a
/// shutdown signal arrives.
pub async fn run() -> Result<(), RunError> {
    init_tracing();

    tracing::info!("{} server starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::ServerConfig::from_env()?;
    tracing::info!(
        port = config.port,
        production = config.production,
        "Configuration loaded"
    );
    if config.api_token.is_none() {
        tracing::warn!("API_TOKEN not set, any bearer token is accepted");
    }

    api::serve(config).await?;
    Ok(())
}
