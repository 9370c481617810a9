//! REST API endpoints.
//!
//! Read-only Axum API over the match log. Every request reloads the log
//! and goes through the shared stats cache, so the report is only
//! recomputed when the log actually changed.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::new().allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new().allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any origin", origin);
            CorsLayer::new().allow_origin(Any)
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/stats", get(routes::stats::get_stats))
        .route("/api/stats/commanders", get(routes::stats::list_commanders))
        .route(
            "/api/stats/commanders/:name",
            get(routes::stats::get_commander),
        )
        .route(
            "/api/stats/color-identities",
            get(routes::stats::list_color_identities),
        )
        .route(
            "/api/stats/color-identities/:key",
            get(routes::stats::get_color_identity),
        )
        .route("/api/integrity", get(routes::integrity::list_issues))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}
