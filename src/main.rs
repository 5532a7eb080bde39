use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use neoflix_api::{
    auth::{PasswordHasher, TokenIssuer},
    config::Settings,
    create_router,
    graph::{neo4j::Neo4jDriver, schema, TransactionExecutor},
    AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Neoflix API - Starting...");

    let settings = Settings::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to Neo4j...");
    let driver = Arc::new(
        Neo4jDriver::connect(&settings.graph)
            .await
            .expect("Failed to connect to Neo4j"),
    );

    schema::ensure_constraints(&TransactionExecutor::new(Arc::clone(&driver)))
        .await
        .expect("Failed to create schema constraints");

    let hasher =
        PasswordHasher::from_settings(&settings.password).expect("Invalid password settings");
    let tokens = Arc::new(TokenIssuer::new(&settings.jwt_secret));
    let state = AppState::new(Arc::clone(&driver), tokens, hasher)
        .expect("Failed to initialize services");

    let app = create_router(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("Neoflix API is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Last handle: dropping it closes the connection pool
    drop(driver);
    tracing::info!("Neoflix API stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
