//! Route definitions for the JSON API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::AppState;

use super::api;

/// Create the API router
pub fn create_router(app_state: Arc<AppState>, config: &HttpConfig) -> Router {
    let cors = if config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/api/status", get(api::get_status))
        .route("/api/config", get(api::get_config))
        .route(
            "/api/avatars",
            get(api::list_avatars).post(api::set_avatar_count),
        )
        .route("/api/avatars/:index/activate", post(api::activate_avatar))
        .route(
            "/api/popup",
            get(api::get_popup).delete(api::close_popup),
        )
        .route("/api/click", post(api::click))
        .route("/api/map/resize", post(api::resize_map))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
