// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use blog_core::domains::auth::JwtService;
use blog_core::kernel::{PageCache, PostgresBlogStore, ServerDeps, StorageClient};
use blog_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,blog_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting developer blog API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let deps = ServerDeps::new(
        Arc::new(PostgresBlogStore::new(pool)),
        Arc::new(StorageClient::new(
            &config.storage_url,
            config.storage_service_key.clone(),
            config.storage_bucket.clone(),
        )),
        PageCache::new(config.page_cache_ttl),
        Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone())),
        config.admin_emails.clone(),
    );
    tracing::info!(admins = config.admin_emails.len(), "Admin allow-list loaded");

    // Build application
    let app = build_app(deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
