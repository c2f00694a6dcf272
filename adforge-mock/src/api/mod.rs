//! API Module
//!
//! HTTP layer of the stub creative service.

pub mod error;
pub mod health;
pub mod image;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::MockState;

/// Create the router with all endpoints
pub fn create_router(state: MockState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/create", post(image::create))
        .route("/create/image/{uid}", get(image::image_status))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
