use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::domain::chunker;
use crate::domain::envelope::build_segments;
use crate::domain::error::DomainError;
use crate::domain::model::{InboundMessage, SegmentEncoding};
use crate::domain::sink::SegmentSink;

/// Configuration for the segmentation service
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    pub chunk_size: NonZeroUsize,
    pub encoding: SegmentEncoding,
}

/// Cuts inbound messages into segments and hands them to a sink, one at a
/// time and in order.
///
/// Holds no per-request state; one instance is shared by all handlers.
#[derive(Clone)]
pub struct SegmentationService {
    sink: Arc<dyn SegmentSink>,
    config: ServiceConfig,
}

impl SegmentationService {
    #[must_use]
    pub fn new(sink: Arc<dyn SegmentSink>, config: ServiceConfig) -> Self {
        Self { sink, config }
    }

    #[must_use]
    pub fn config(&self) -> ServiceConfig {
        self.config
    }

    /// Relay a message downstream and return the number of segments delivered.
    ///
    /// The first failed delivery stops the loop; later segments are never
    /// sent. Segments delivered before the failure stay delivered.
    ///
    /// # Errors
    /// - `ChunkSplitsCharacter` before any send, in text encoding
    /// - `DeliveryFailed` carrying the failing ordinal
    #[instrument(
        skip(self, message),
        fields(payload_len = message.payload.len(), chunk_size = self.config.chunk_size.get())
    )]
    pub async fn relay(&self, message: &InboundMessage) -> Result<usize, DomainError> {
        let chunks = chunker::split(&message.payload, self.config.chunk_size);
        let segments = build_segments(chunks, message.timestamp, self.config.encoding)?;
        let count = segments.len();

        for segment in &segments {
            if let Err(source) = self.sink.deliver(segment).await {
                error!(
                    ordinal = segment.ordinal,
                    count,
                    error = %source,
                    "segment delivery failed; aborting remaining segments"
                );
                return Err(DomainError::DeliveryFailed {
                    ordinal: segment.ordinal,
                    count,
                    source,
                });
            }
            debug!(ordinal = segment.ordinal, count, "segment delivered");
        }

        info!(count, "message relayed");
        Ok(count)
    }
}
