//! HTTP front door for liftlog.
//!
//! Routes method + path to the workout service and renders JSON. CORS is
//! open to any origin.

use axum::middleware as axum_mw;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Unknown methods on known paths get the same 404 as unknown paths
    Router::new()
        .route(
            "/exercises",
            get(routes::exercises::list_exercises).fallback(routes::not_found),
        )
        .route(
            "/workouts/latest",
            get(routes::workouts::latest_workout).fallback(routes::not_found),
        )
        .route(
            "/workouts",
            get(routes::workouts::workout_history)
                .post(routes::workouts::create_workout)
                .fallback(routes::not_found),
        )
        .fallback(routes::not_found)
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors)
        .with_state(state)
}
