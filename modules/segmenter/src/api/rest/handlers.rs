use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::http::{StatusCode, Uri};
use bytes::Bytes;
use relay_errors::Problem;

use super::dto::{HealthDto, SplitRequest};
use super::error::domain_error_to_problem;
use crate::domain::{DomainError, SegmentationService};

/// Accept a message and relay its segments downstream.
///
/// The body is parsed as JSON whatever its content type; any parse failure is
/// a 400 and nothing is sent. Success is an empty 200.
///
/// # Errors
/// A Problem response: 400 for bad input, 500 when a delivery fails.
pub async fn split(
    Extension(svc): Extension<Arc<SegmentationService>>,
    uri: Uri,
    body: Bytes,
) -> Result<StatusCode, Problem> {
    let req: SplitRequest = serde_json::from_slice(&body)
        .map_err(|e| domain_error_to_problem(&DomainError::malformed(e.to_string()), uri.path()))?;

    svc.relay(&req.into())
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    Ok(StatusCode::OK)
}

#[allow(clippy::unused_async)]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto { status: "ok" })
}
