//! Router configuration for the HTTP API.
//!
//! Mounts the booking routes under the configured base path and wraps the
//! whole router in logging, tracing and CORS layers.

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{bookings, health};
use crate::logger::{request_id_middleware, request_logger};
use crate::state::AppState;

/// Booking routes, relative to their mount point
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/search", get(bookings::search_bookings))
        .route("/count", get(bookings::count_bookings))
        .route(
            "/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
}

/// Create the main application router with all routes and middleware.
///
/// `base_path` must start with `/` and must not be `/` itself
/// (see [`crate::config::normalize_base_path`]).
pub fn create_router(state: AppState, base_path: &str) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest(base_path, booking_routes())
        // Middleware (order matters - request_id should be outermost of the two)
        .layer(middleware::from_fn(request_logger))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
