use squad_ledger::{api, config::Config, db, state::AppState};

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting squad-ledger");

    // Load configuration
    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={}, server={}:{}",
        config.database_backend, config.server_host, config.server_port
    );

    // Setup database connection and schema
    let db_pool = db::connection::establish_connection(&config).await?;
    db::migration::bootstrap(&db_pool, &config).await?;

    let addr = format!("{}:{}", config.server_host, config.server_port);

    // Create shared state
    let app_state = Arc::new(AppState { config, db_pool });

    // Start HTTP server
    let app = api::create_router(app_state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
