//! Liveness endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Root banner response
#[derive(Serialize)]
pub struct BannerResponse {
    pub message: String,
}

/// GET / - running banner with the deployment tag
async fn banner(State(state): State<Arc<AppState>>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: format!("Server is running with tag {}", state.tag),
    })
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}
