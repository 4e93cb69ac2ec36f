use crate::error::HttpError;
use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::BodyExt;

/// Bytes of an error body kept for logs.
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Type-erased response body.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// A receiver's response. Status is available up front; body reads are
/// capped at the client's response size limit.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Up to [`ERROR_BODY_PREVIEW_LIMIT`] bytes of the body as lossy UTF-8.
    ///
    /// An oversized body yields a placeholder, never an error, so the status
    /// that prompted the read is not masked.
    ///
    /// # Errors
    /// Returns a transport error if the body stream fails.
    pub async fn body_preview(self) -> Result<String, HttpError> {
        let limit = self.max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        match collect_limited(self.inner, limit).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(HttpError::BodyTooLarge { .. }) => Ok("<body too large for preview>".to_owned()),
            Err(e) => Err(e),
        }
    }

    /// Read the whole body.
    ///
    /// # Errors
    /// `BodyTooLarge` past the size limit, or a transport error.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        collect_limited(self.inner, self.max_body_size).await
    }
}

async fn collect_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut collected = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        let Some(chunk) = frame.data_ref() else {
            continue;
        };
        let actual = collected.len() + chunk.len();
        if actual > limit {
            return Err(HttpError::BodyTooLarge { limit, actual });
        }
        collected.extend_from_slice(chunk);
    }

    Ok(Bytes::from(collected))
}
