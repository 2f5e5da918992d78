use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use webhook_bot::bot::{self, BotContext, CommandDispatcher, WebhookState};
use webhook_bot::config::{AppConfig, DatabaseConfig};
use webhook_bot::errors::error_logging;
use webhook_bot::telegram::ApiClient;
use webhook_bot::{db, localization, observability};

/// Connect the optional database pool and make sure the schema exists
async fn connect_database(config: &DatabaseConfig) -> Result<Option<Arc<sqlx::PgPool>>> {
    let Some(url) = config.url.as_deref() else {
        info!("DATABASE_URL not set, running without persistence");
        return Ok(None);
    };

    info!("Initializing database connection");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    db::init_database_schema(&pool).await?;
    Ok(Some(Arc::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    if let Err(e) = config.validate() {
        error_logging::log_config_error(&e, "app_config", "startup_validation");
        return Err(e.into());
    }

    let metrics_handle = observability::init_observability(&config.observability)?;
    info!("{}", config.summary());

    let pool = connect_database(&config.database).await?;
    let localization_manager = localization::create_localization_manager()?;
    let api = ApiClient::new(config.bot.clone())?;

    let ctx = Arc::new(BotContext::new(api, localization_manager, pool));
    let mut state = WebhookState::new(ctx, CommandDispatcher::default());
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }

    let listener = TcpListener::bind(config.server.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address()))?;

    bot::serve(listener, state, shutdown_signal()).await
}
