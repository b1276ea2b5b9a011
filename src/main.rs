use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use careline_server::{
    config::settings::{Config, LoggingConfig},
    error::{CarelineError, Result},
    server::startup::start_server,
    storage::init_storage,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::load();
    init_tracing(&config.logging)?;

    if let Err(e) = config.validate() {
        error!("❌ Invalid configuration: {}", e);
        return Err(e);
    }

    info!("🚀 Starting CareLine Server v{}", env!("CARGO_PKG_VERSION"));

    // A persistence handle must exist before any request is served
    let storage = init_storage(&config).await?;

    match start_server(config, storage).await {
        Ok(_) => {
            info!("✅ Server shutdown completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("❌ Server failed: {}", e);
            Err(e)
        }
    }
}

/// Initialize structured logging
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let default_filter = format!("careline_server={},{}", logging.level, logging.level);
    let filter = env::var("RUST_LOG")
        .ok()
        .and_then(|directives| tracing_subscriber::EnvFilter::try_new(directives).ok())
        .map_or_else(|| tracing_subscriber::EnvFilter::try_new(&default_filter), Ok)
        .map_err(|e| CarelineError::config(format!("Invalid log filter: {}", e)))?;

    // JSON logging for production
    let (compact_layer, json_layer) = if logging.json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false);
        (None, Some(json_layer))
    } else {
        let compact_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(false)
            .with_line_number(false)
            .compact();
        (Some(compact_layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(compact_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| {
            CarelineError::internal(format!("Failed to install tracing subscriber: {}", e))
        })?;

    info!("✅ Structured logging initialized with level: {}", logging.level);
    Ok(())
}
