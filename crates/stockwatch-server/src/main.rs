mod api;
mod middleware;

use std::sync::Arc;

use stockwatch_catalog::{CatalogClient, CatalogError};
use stockwatch_db::PgStore;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = stockwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = stockwatch_db::PoolConfig::from_app_config(&config);
    let pool = stockwatch_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = stockwatch_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");

    let catalog = match CatalogClient::from_app_config(&config) {
        Ok(client) => Some(client),
        Err(CatalogError::NotConfigured(var)) => {
            tracing::warn!(missing = var, "catalog API not configured; sync endpoint disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let app = build_app(AppState::new(Arc::new(PgStore::new(pool)), catalog));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "stockwatch-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
