use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::SegmentationService;

/// Register the segmenter's REST routes on `router`.
///
/// `route_path` must already be validated (see `SegmenterConfig::validate`);
/// axum panics on malformed paths.
#[must_use]
pub fn register_routes(
    router: Router,
    route_path: &str,
    service: Arc<SegmentationService>,
) -> Router {
    router
        .route(route_path, post(handlers::split))
        .route("/health", get(handlers::health))
        .layer(Extension(service))
}
