use async_trait::async_trait;
use thiserror::Error;

use crate::domain::model::Segment;

/// Why a single segment could not be delivered
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The destination answered with something other than 200 OK.
    #[error("destination responded with status {status}: {body_preview}")]
    Rejected { status: u16, body_preview: String },

    /// The request never produced a response (connect, TLS, timeout, encoding).
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Destination for outbound segments.
///
/// Implementations deliver exactly one segment per call and never retry.
#[async_trait]
pub trait SegmentSink: Send + Sync {
    /// # Errors
    /// Returns [`DeliveryError`] when the segment was not accepted.
    async fn deliver(&self, segment: &Segment) -> Result<(), DeliveryError>;
}
