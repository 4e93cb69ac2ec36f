use thiserror::Error;

use crate::domain::sink::DeliveryError;

/// Domain-specific errors for the segmenter
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Chunk {ordinal} splits a multi-byte UTF-8 character")]
    ChunkSplitsCharacter { ordinal: usize },

    #[error("Delivery of segment {ordinal} of {count} failed")]
    DeliveryFailed {
        ordinal: usize,
        count: usize,
        #[source]
        source: DeliveryError,
    },
}

impl DomainError {
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest { .. } | Self::ChunkSplitsCharacter { .. }
        )
    }
}
