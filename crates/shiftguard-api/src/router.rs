//! Route definitions for the ShiftGuard internal API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
        .route("/clock/in", post(handlers::timeclock::clock_in))
        .route("/clock/out", post(handlers::timeclock::clock_out))
        .route(
            "/ledger/{employee_id}/verify",
            get(handlers::ledger::verify),
        )
        .route("/compliance/check", post(handlers::compliance::check))
        .route(
            "/employees/{employee_id}/violations",
            get(handlers::violations::list),
        )
        .route(
            "/violations/{id}/acknowledge",
            post(handlers::violations::acknowledge),
        )
        .route(
            "/internal/enforcement/run",
            post(handlers::enforcement::run),
        )
        .route(
            "/internal/enforcement/safety-net",
            post(handlers::enforcement::safety_net),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
