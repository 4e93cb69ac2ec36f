use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;
use bytes::Bytes;
use http::{Method, Request, Uri, header};
use http_body_util::Full;
use serde::Serialize;
use tower::Service;

/// A pending POST, created by [`HttpClient::post`](crate::HttpClient::post).
///
/// ```ignore
/// let resp = client
///     .post("http://receiver.local:8000/api/delivery/")
///     .json(&segment)?
///     .send()
///     .await?;
/// ```
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    url: String,
    /// Serialized JSON, sent with `Content-Type: application/json`.
    json: Option<Bytes>,
    transport_security: TransportSecurity,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        url: String,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            url,
            json: None,
            transport_security,
        }
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    /// `HttpError::Json` if serialization fails.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        self.json = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Parse the URL and check its scheme against the transport mode.
    fn target(&self) -> Result<Uri, HttpError> {
        let invalid = |kind, reason: String| HttpError::InvalidUri {
            url: self.url.clone(),
            kind,
            reason,
        };

        let uri: Uri = self
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, e.to_string()))?;
        if uri.authority().is_none() {
            return Err(invalid(
                InvalidUriKind::MissingAuthority,
                "missing host".to_owned(),
            ));
        }

        match (uri.scheme_str(), self.transport_security) {
            (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => Ok(uri),
            (Some("http"), TransportSecurity::TlsOnly) => Err(HttpError::InvalidScheme {
                scheme: "http".to_owned(),
                reason: "client is configured for TLS only".to_owned(),
            }),
            (Some(other), _) => Err(HttpError::InvalidScheme {
                scheme: other.to_owned(),
                reason: "expected http or https".to_owned(),
            }),
            (None, _) => Err(invalid(
                InvalidUriKind::MissingScheme,
                "missing scheme".to_owned(),
            )),
        }
    }

    /// Send the request.
    ///
    /// Any response, whatever its status, is `Ok`.
    ///
    /// # Errors
    /// Invalid URL or scheme, a full request buffer (`Overloaded`), timeout,
    /// TLS or other transport failure.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        let uri = self.target()?;

        let mut request = Request::builder().method(Method::POST).uri(uri);
        let body = match self.json.take() {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                json
            }
            None => Bytes::new(),
        };
        let request = request.body(Full::new(body))?;

        try_acquire_buffer_slot(&mut self.service).await?;
        let inner = self.service.call(request).await.map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}
