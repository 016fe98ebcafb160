//! Wall Build API Routes
//!
//! REST endpoints consumed by the wall presentation layer.
//!
//! ## Endpoints
//!
//! - `POST /api/init` - Start a session from `{width, height, mode, bond}`
//! - `GET /api/next` - Place the next brick (also accepted as `POST`)
//! - `POST /api/reset` - Start the current wall over from the first brick
//! - `GET /api/wall` - Session progress and snapshot, no mutation
//! - `GET /api/health` - Liveness

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::{ReachEnvelope, WallConfig};
use crate::error::WallError;
use crate::sequencer::{AdvanceOutcome, BuildProgress};
use crate::session::WallSession;
use crate::wall::WallSnapshot;

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Initialize body. Fields are optional and loosely typed so that missing or
/// out-of-range values come back as `InvalidConfig` with the field named.
#[derive(Debug, Default, Deserialize)]
pub struct InitializeRequest {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub mode: Option<String>,
    pub bond: Option<String>,
}

impl InitializeRequest {
    pub fn into_config(self) -> Result<WallConfig, WallError> {
        let width = self.width.ok_or_else(|| missing("width"))?;
        let height = self.height.ok_or_else(|| missing("height"))?;
        let mode = self.mode.ok_or_else(|| missing("mode"))?;
        let bond = self.bond.ok_or_else(|| missing("bond"))?;
        WallConfig::new(width, height, &bond, &mode)
    }
}

fn missing(field: &str) -> WallError {
    WallError::invalid_config(field, "null", "is required")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct WallStatusResponse {
    pub progress: BuildProgress,
    pub wall: WallSnapshot,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub initialized: bool,
    pub reach: ReachEnvelope,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a wall error to a status code and JSON body.
pub fn error_response(err: WallError) -> ApiError {
    let (status, kind) = match &err {
        WallError::InvalidConfig { .. } => (StatusCode::BAD_REQUEST, "invalid_config"),
        WallError::UnsatisfiableBond { .. } => (StatusCode::BAD_REQUEST, "unsatisfiable_bond"),
        WallError::NotInitialized => (StatusCode::BAD_REQUEST, "not_initialized"),
        WallError::SupportViolation { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "support_violation")
        }
        WallError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };

    if err.is_fatal() {
        error!("Internal invariant violated: {}", err);
    } else {
        warn!("Rejected wall request: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            kind: kind.to_string(),
        }),
    )
}

// =============================================================================
// ROUTE HANDLERS
// =============================================================================

/// POST /api/init - Start a new wall session
///
/// Body rejections (malformed JSON, wrong field types, missing content type)
/// are reported as `InvalidConfig` on `body`.
async fn init_wall(
    State(session): State<WallSession>,
    payload: Result<Json<InitializeRequest>, JsonRejection>,
) -> Result<Json<WallSnapshot>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        error_response(WallError::invalid_config(
            "body",
            rejection.body_text(),
            "must be a JSON object with width, height, mode and bond",
        ))
    })?;
    let config = req.into_config().map_err(error_response)?;
    let snapshot = session.initialize(config).await.map_err(error_response)?;
    Ok(Json(snapshot))
}

/// GET /api/next - Place the next brick
async fn next_brick(
    State(session): State<WallSession>,
) -> Result<Json<AdvanceOutcome>, ApiError> {
    let outcome = session.advance().await.map_err(error_response)?;
    Ok(Json(outcome))
}

/// POST /api/reset - Start the current wall over
async fn reset_wall(
    State(session): State<WallSession>,
) -> Result<Json<WallSnapshot>, ApiError> {
    let snapshot = session.reset().await.map_err(error_response)?;
    Ok(Json(snapshot))
}

/// GET /api/wall - Progress and snapshot
async fn wall_status(
    State(session): State<WallSession>,
) -> Result<Json<WallStatusResponse>, ApiError> {
    let (progress, wall) = session.progress().await.map_err(error_response)?;
    Ok(Json(WallStatusResponse { progress, wall }))
}

/// GET /api/health
async fn health_check(State(session): State<WallSession>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        initialized: session.is_initialized().await,
        reach: session.reach(),
    })
}

// =============================================================================
// ROUTER
// =============================================================================

/// Create the wall router, to be nested under `/api`
pub fn create_wall_router(session: WallSession) -> Router {
    Router::new()
        .route("/init", post(init_wall))
        .route("/next", get(next_brick).post(next_brick))
        .route("/reset", post(reset_wall))
        .route("/wall", get(wall_status))
        .route("/health", get(health_check))
        .with_state(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_invalid_config() {
        let req = InitializeRequest {
            width: Some(4),
            height: None,
            mode: Some("left-to-right".to_string()),
            bond: Some("stretcher".to_string()),
        };
        let err = req.into_config().unwrap_err();
        assert!(matches!(err, WallError::InvalidConfig { ref field, .. } if field == "height"));
    }

    #[test]
    fn test_error_status_codes() {
        let (status, body) = error_response(WallError::NotInitialized);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.error, "Wall not initialized");
        assert_eq!(body.0.kind, "not_initialized");

        let (status, _) = error_response(WallError::SupportViolation { row: 1, index: 0 });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
