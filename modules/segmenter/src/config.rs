use std::num::NonZeroUsize;
use std::time::Duration;

use relay_http::TransportSecurity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SegmentEncoding;
use crate::domain::service::ServiceConfig;

/// Configuration for the segmenter module, as read from YAML/env
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Segment size in bytes. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    /// `host:port` or an absolute `http(s)://` URL. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address: Option<String>,
    #[serde(default = "default_route_path")]
    pub route_path: String,
    #[serde(default)]
    pub segment_encoding: SegmentEncoding,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_request_body_bytes")]
    pub max_request_body_bytes: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            chunk_size: None,
            destination_address: None,
            route_path: default_route_path(),
            segment_encoding: SegmentEncoding::default(),
            request_timeout_secs: default_request_timeout_secs(),
            max_request_body_bytes: default_max_request_body_bytes(),
        }
    }
}

fn default_route_path() -> String {
    "/split".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_request_body_bytes() -> usize {
    1024 * 1024
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chunk_size is required")]
    MissingChunkSize,

    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("destination_address is required")]
    MissingDestination,

    #[error("invalid destination_address '{address}': {reason}")]
    InvalidDestination { address: String, reason: String },

    #[error(
        "invalid route_path '{0}': must be a literal path starting with '/' and must not be '/health'"
    )]
    InvalidRoutePath(String),

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validated segmenter settings
#[derive(Debug, Clone)]
pub struct SegmenterSettings {
    pub chunk_size: NonZeroUsize,
    /// Absolute destination URL.
    pub destination: String,
    /// Plain HTTP is allowed only when the destination uses it.
    pub transport: TransportSecurity,
    pub route_path: String,
    pub encoding: SegmentEncoding,
    pub request_timeout: Duration,
    pub max_request_body_bytes: usize,
}

impl SegmenterSettings {
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            chunk_size: self.chunk_size,
            encoding: self.encoding,
        }
    }
}

impl SegmenterConfig {
    /// Turn the raw config into typed settings.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<SegmenterSettings, ConfigError> {
        let chunk_size = self.chunk_size.ok_or(ConfigError::MissingChunkSize)?;
        let chunk_size = NonZeroUsize::new(chunk_size).ok_or(ConfigError::ZeroChunkSize)?;

        let raw_destination = self
            .destination_address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingDestination)?;
        let (destination, transport) = normalize_destination(raw_destination)?;

        if !is_literal_route(&self.route_path) {
            return Err(ConfigError::InvalidRoutePath(self.route_path.clone()));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(SegmenterSettings {
            chunk_size,
            destination,
            transport,
            route_path: self.route_path.clone(),
            encoding: self.segment_encoding,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_request_body_bytes: self.max_request_body_bytes,
        })
    }
}

/// A route path the router accepts as a plain literal: starts with `/`, is
/// not the health route, and carries no capture or wildcard syntax.
fn is_literal_route(path: &str) -> bool {
    path.starts_with('/')
        && path != "/health"
        && !path.contains(['{', '}', '*'])
        && !path.split('/').any(|segment| segment.starts_with(':'))
}

/// Normalize a destination to an absolute URL.
///
/// A bare `host:port` (optionally followed by a path) becomes
/// `http://host:port`.
///
/// # Errors
/// `InvalidDestination` for unparsable addresses, a missing host or a scheme
/// other than `http`/`https`.
pub fn normalize_destination(raw: &str) -> Result<(String, TransportSecurity), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDestination {
        address: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let url = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };

    let uri: http::Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
    if uri.host().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }

    let transport = match uri.scheme_str() {
        Some("https") => TransportSecurity::TlsOnly,
        Some("http") => TransportSecurity::AllowInsecureHttp,
        _ => return Err(invalid("scheme must be http or https")),
    };

    Ok((url, transport))
}
