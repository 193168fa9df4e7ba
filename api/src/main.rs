use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use roster_api::{
    config::{LogFormat, RosterApiConfig},
    context::ApiContext,
    server,
};
use roster_db::storage::{Storage, sqlite::SqliteStorage};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "roster_api=info,roster_common=info,roster_db=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RosterApiConfig::parse();

    if config.dump_openapi {
        let json = server::openapi().to_pretty_json()?;
        print!("{}", json);
        return Ok(());
    }

    init_tracing(config.log_format);

    let storage = SqliteStorage::connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let applied = storage.migrate().await.context("Failed to migrate database")?;
    info!(applied, database_url = %config.database_url, "Database ready");

    let bind_addr = config.bind_addr;
    let router = server::make(ApiContext::new(config, Arc::new(storage)))?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    info!("Listening on http://{:?}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server exited with an error")?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or(DEFAULT_LOG_FILTER.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
