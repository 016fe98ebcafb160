//! HTTP transport for the wall builder.

pub mod wall_routes;

use std::path::Path;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::session::WallSession;

pub use wall_routes::{create_wall_router, ErrorResponse, InitializeRequest};

/// Build the full application: API under `/api`, optional static assets at
/// `/`, tracing and open CORS.
pub fn create_app(config: &ServerConfig) -> Router {
    let session = WallSession::new(config.reach);
    create_app_with_session(session, config.static_dir.as_deref())
}

pub fn create_app_with_session(session: WallSession, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new().nest("/api", create_wall_router(session));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    )
}
