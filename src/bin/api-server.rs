//! Marketing Intelligence API Server
//!
//! Serves filtered marketing, blended KPI and data-quality views as JSON.
//! Source CSVs are re-read only when their modification time changes.

use dotenvy::dotenv;
use marketing_intel::config::{get_environment, get_port};
use marketing_intel::core::http::start_server;
use marketing_intel::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = get_port();
    let env = get_environment();
    info!("Starting Marketing Intelligence API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
