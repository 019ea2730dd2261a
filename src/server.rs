//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, sweeper spawning, and the Axum
//! server lifecycle.

use crate::application::services::{AuthService, LinkService, LinkSettings};
use crate::application::sweeper::run_sweeper;
use crate::config::Config;
use crate::domain::repositories::{LinkRepository, TokenRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache, TtlPolicy};
use crate::infrastructure::persistence::{PgLinkRepository, PgTokenRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Builds the PostgreSQL pool from the configured limits.
///
/// # Errors
///
/// Returns an error if the initial connection cannot be established.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    Ok(pool)
}

/// Connects to Redis when configured, otherwise falls back to [`NullCache`].
///
/// An unreachable Redis at startup is logged and degrades to [`NullCache`]
/// rather than aborting.
async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, TtlPolicy::new(config.cache_ttl())).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache (or NullCache fallback)
/// - Expired link sweeper
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let cache = build_cache(&config).await;

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let token_repository: Arc<dyn TokenRepository> = Arc::new(PgTokenRepository::new(pool));

    let link_service = Arc::new(LinkService::new(
        link_repository,
        cache,
        Arc::new(RandomCodeGenerator::new(config.short_code_length)),
        LinkSettings {
            base_url: config.base_url.clone(),
            default_lifetime: config.default_link_lifetime(),
        },
    ));
    let auth_service = Arc::new(AuthService::new(
        token_repository,
        config.token_signing_secret.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(run_sweeper(
        link_service.clone(),
        config.sweep_interval(),
        shutdown_rx,
    ));

    let state = AppState::new(link_service, auth_service);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    tracing::info!("HTTP server stopped, waiting for sweeper");
    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        tracing::error!(error = %e, "Sweeper task ended abnormally");
    }

    served?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
