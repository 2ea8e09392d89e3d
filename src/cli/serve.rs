use std::path::Path;
use crate::cli::commands::ServeArgs;
use crate::config::load_config;
use crate::errors::GatewayError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), GatewayError> {
    let mut config = load_config(args.config.as_deref().map(Path::new)).await?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    info!(host = %config.host, port = config.port, "Starting API server");

    let state = api::create_app_state(&config).await?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    info!("Health check: http://{}/api/health", addr);
    info!("Scan endpoint: http://{}/api/scan", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Internal(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
