//! Wall Builder REST API Server
//!
//! Holds a single wall-build session in memory and serves it to the
//! presentation layer.
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! PORT=8000 WALL_STATIC_DIR=frontend/dist cargo run --bin wall_server
//!
//! # Test endpoints
//! curl -X POST http://localhost:8000/api/init \
//!   -H "Content-Type: application/json" \
//!   -d '{"width": 4, "height": 2, "mode": "left-to-right", "bond": "stretcher"}'
//!
//! curl http://localhost:8000/api/next
//! curl http://localhost:8000/api/wall
//! curl -X POST http://localhost:8000/api/reset
//! curl http://localhost:8000/api/health
//! ```

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wall_builder::api::create_app;
use wall_builder::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wall_builder=info,tower_http=debug")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    info!(
        stride_width = config.reach.width(),
        stride_height = config.reach.height(),
        static_dir = ?config.static_dir,
        "Starting wall server"
    );

    let app = create_app(&config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
