use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, metrics_handler, not_found_handler, reason_handler};
use crate::middleware::rate_limit;
use crate::state::AppState;

/// Builds the full application: routes, 404 fallback, the rate limit gate
/// (which also covers the fallback) and panic recovery on the outside.
///
/// The rate limiter reads `ConnectInfo<SocketAddr>`, so serve this with
/// `into_make_service_with_connect_info`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthcheck", get(health_handler))
        .route("/reason", get(reason_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
