//! REST interface to the state and county registries

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the REST router with tracing and permissive CORS
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        // States
        .route("/api/v1/states", get(handlers::get_states))
        .route("/api/v1/states/:query", get(handlers::get_state))
        .route("/api/v1/states/:query/counties", get(handlers::get_state_counties))
        .route("/api/v1/states/:query/counties/:county", get(handlers::get_county))
        // Counties
        .route("/api/v1/counties", get(handlers::get_counties))
        .route("/api/v1/lookup", post(handlers::lookup))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
