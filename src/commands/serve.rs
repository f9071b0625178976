//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Connects and applies pending migrations
    let db = Arc::new(Database::connect(&config).await?);

    if !config.smtp.is_configured() {
        tracing::warn!("SMTP_HOST not set; deletion notices will only be logged");
    }
    tracing::info!(
        lockout_enabled = config.lockout.enabled,
        max_attempts = config.lockout.max_attempts,
        "Login lockout policy"
    );

    let addr = format!(
        "{}:{}",
        args.host.unwrap_or_else(|| config.server_host.clone()),
        args.port.unwrap_or(config.server_port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    let app = create_router(AppState::from_config(db, config));

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
