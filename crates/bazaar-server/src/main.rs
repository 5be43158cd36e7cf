//! Bazaar Server — application entry point.

use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod error;
mod routes;
mod state;

use bazaar_db::DbManager;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bazaar=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Bazaar server...");

    let config = ServerConfig::from_env();

    let manager = match DbManager::connect(&config.db).await {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = bazaar_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    let state = AppState::new(manager.client().clone(), &config);
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(%addr, "Bazaar server listening");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
