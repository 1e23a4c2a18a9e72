//! Hello Auth API - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the authentication provider and HTTP router
//! 5. Start server on configured port

use std::sync::Arc;

use hello_auth_api::{
    app::{self, AppState},
    auth::{EmailPasswordAuth, ProviderConfig, store},
    config, db,
};
use tracing_subscriber::EnvFilter;

/// Signing key used when `AUTH_SECRET` is not set. Development only.
const DEV_AUTH_SECRET: &str = "hello-auth-api-development-secret";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let purged = store::purge_expired_sessions(&pool).await?;
    if purged > 0 {
        tracing::info!(purged, "Removed expired sessions");
    }

    let secret = config.auth_secret.clone().unwrap_or_else(|| {
        tracing::warn!("AUTH_SECRET is not set; using the development signing key");
        DEV_AUTH_SECRET.to_string()
    });

    // Built once and shared by every request through the router state
    let provider = EmailPasswordAuth::new(
        pool,
        ProviderConfig {
            base_path: app::AUTH_BASE_PATH.to_string(),
            secret,
            trusted_origins: vec![config.cors_origin.clone()],
        },
    );

    let router = app::build_router(
        AppState::new(Arc::new(provider)),
        app::cors_layer(&config.cors_origin)?,
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
