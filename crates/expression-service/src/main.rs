//! Expression Service
//!
//! REST API for saving, validating and evaluating logical expressions.

use anyhow::{Context, Result};
use expression_service::{create_router, AppState, Config, ExpressionStore, MemoryStore, RedisStore, StorageBackend};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expression_service=debug,expression_validator=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Expression Service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded - listening on {}", config.api_address());

    let store: Arc<dyn ExpressionStore> = match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory expression store");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Redis => {
            info!("Redis URL: {}", config.redis_url);
            Arc::new(
                RedisStore::new(&config.redis_url)
                    .await
                    .context("Failed to initialize storage")?,
            )
        }
    };

    let app = create_router(AppState::new(store));

    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("Expression Service running on http://{}", config.api_address());

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
