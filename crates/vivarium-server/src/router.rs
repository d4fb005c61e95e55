//! Axum router construction for the API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the API server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/new_single_sim` -- validated single run
/// - `GET /api/new_random_sim` -- randomized single run
/// - `GET /api/new_multiple_sim/{iterations}` -- concurrent batch
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/new_single_sim", get(handlers::new_single_sim))
        .route("/api/new_random_sim", get(handlers::new_random_sim))
        .route(
            "/api/new_multiple_sim/{iterations}",
            get(handlers::new_multiple_sim),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
