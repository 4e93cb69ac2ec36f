use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use relay_errors::{APPLICATION_PROBLEM_JSON, Problem, catalog};

use crate::domain::DomainError;

/// Map a domain error to an RFC 9457 Problem
///
/// Delivery failures keep a generic detail; the failing ordinal is only
/// logged.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::MalformedRequest { .. } | DomainError::ChunkSplitsCharacter { .. } => {
            catalog::MALFORMED_REQUEST.as_problem(e.to_string())
        }
        DomainError::DeliveryFailed { .. } => {
            catalog::DELIVERY_FAILED.as_problem("Failed to deliver the message downstream")
        }
    };

    relay_errors::finalize(problem, instance, trace_id)
}

/// Middleware: rewrite a plain-text 413 from the body limit layers into a
/// Problem response.
///
/// Must wrap the limit layers to see their rejections.
pub async fn oversized_body_to_problem(req: Request, next: Next) -> Response {
    let instance = req.uri().path().to_owned();
    let response = next.run(req).await;

    let is_problem = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|ct| ct == APPLICATION_PROBLEM_JSON);
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_problem {
        return response;
    }

    tracing::debug!(path = %instance, "rejected oversized request body");
    let problem = catalog::PAYLOAD_TOO_LARGE
        .as_problem("Request body exceeds the configured size limit");
    relay_errors::finalize(problem, &instance, None).into_response()
}

/// Implement `From<DomainError>` for `Problem` so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "/")
    }
}
