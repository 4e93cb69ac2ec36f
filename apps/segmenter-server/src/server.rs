use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use segmenter::api::rest::{oversized_body_to_problem, register_routes};
use segmenter::{HttpSegmentSink, SegmentationService};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerSettings;

/// Wire the segmenter service into an axum router.
///
/// Must run inside a tokio runtime (the outbound client spawns its worker).
///
/// # Errors
/// Fails if the outbound HTTP client cannot be built.
pub fn build_router(settings: &ServerSettings) -> Result<Router> {
    let seg = &settings.segmenter;
    let sink = HttpSegmentSink::from_settings(seg).context("failed to build outbound client")?;
    tracing::info!(
        destination = %sink.destination(),
        chunk_size = seg.chunk_size.get(),
        encoding = ?seg.encoding,
        "segment sink ready"
    );

    let service = Arc::new(SegmentationService::new(
        Arc::new(sink),
        seg.service_config(),
    ));

    let router = register_routes(Router::new(), &seg.route_path, service)
        .layer(RequestBodyLimitLayer::new(seg.max_request_body_bytes))
        .layer(DefaultBodyLimit::max(seg.max_request_body_bytes))
        .layer(axum::middleware::from_fn(oversized_body_to_problem))
        .layer(TraceLayer::new_for_http());
    Ok(router)
}

/// Bind, then serve until `cancel` fires.
///
/// # Errors
/// Fails if the address cannot be bound or the server errors.
pub async fn serve(settings: &ServerSettings, router: Router, cancel: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(settings.listen_address)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_address))?;
    tracing::info!(
        address = %settings.listen_address,
        route = %settings.segmenter.route_path,
        "HTTP server listening"
    );

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}
