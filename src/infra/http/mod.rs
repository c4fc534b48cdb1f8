mod error;
mod handlers;
mod middleware;
mod state;

pub use error::{ApiError, ApiErrorBody};
pub use handlers::{PROMETHEUS_CONTENT_TYPE, SERVICE_NAME};
pub use middleware::RequestContext;
pub use state::HttpState;

use axum::{Router, middleware as axum_middleware, routing::get};

use middleware::{catch_panics, log_responses, set_request_context, track_requests};

/// Public JSON surface of the service.
pub fn build_router(state: HttpState) -> Router {
    let metrics = state.metrics.clone();
    let panic_state = state.clone();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/content", get(handlers::list_content))
        .route("/content/{id}", get(handlers::content_detail))
        .route("/genres", get(handlers::genres))
        .route("/search/suggestions", get(handlers::search_suggestions))
        .route("/stats", get(handlers::stats))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(panic_state, catch_panics))
        .layer(axum_middleware::from_fn_with_state(metrics, track_requests))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
