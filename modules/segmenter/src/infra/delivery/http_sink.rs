use async_trait::async_trait;
use http::StatusCode;
use relay_http::{HttpClient, HttpClientBuilder, HttpError};
use tracing::debug;

use crate::config::SegmenterSettings;
use crate::domain::model::Segment;
use crate::domain::sink::{DeliveryError, SegmentSink};

/// Delivers segments as JSON POSTs to a fixed destination URL.
///
/// Only `200 OK` counts as delivered.
#[derive(Clone, Debug)]
pub struct HttpSegmentSink {
    client: HttpClient,
    destination: String,
}

impl HttpSegmentSink {
    #[must_use]
    pub fn new(client: HttpClient, destination: impl Into<String>) -> Self {
        Self {
            client,
            destination: destination.into(),
        }
    }

    /// Build the outbound client from validated settings.
    ///
    /// Must run inside a tokio runtime.
    ///
    /// # Errors
    /// Returns `HttpError` if the client cannot be built (TLS setup).
    pub fn from_settings(settings: &SegmenterSettings) -> Result<Self, HttpError> {
        let client = HttpClientBuilder::new()
            .timeout(settings.request_timeout)
            .transport(settings.transport)
            .build()?;
        Ok(Self::new(client, settings.destination.clone()))
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

#[async_trait]
impl SegmentSink for HttpSegmentSink {
    async fn deliver(&self, segment: &Segment) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.destination)
            .json(segment)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body_preview = response.body_preview().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body_preview,
            });
        }

        // Read the body so the pooled connection can be reused
        if let Err(e) = response.bytes().await {
            debug!(error = %e, "ignoring unreadable body of accepted segment");
        }
        Ok(())
    }
}

fn transport(err: HttpError) -> DeliveryError {
    DeliveryError::Transport(Box::new(err))
}
