use std::time::Duration;

/// Default User-Agent string for outbound requests
pub const DEFAULT_USER_AGENT: &str = concat!("segment-relay/", env!("CARGO_PKG_VERSION"));

/// Largest receiver response body the client will read. Receivers answer
/// with a status and at most a short message.
pub const MAX_RESPONSE_BODY: usize = 64 * 1024;

/// Requests that may queue for the shared pooled client before a send fails
/// with `HttpError::Overloaded`.
pub const BUFFER_CAPACITY: usize = 1024;

pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
pub const POOL_MAX_IDLE_PER_HOST: usize = 32;

/// Which URL schemes the client will connect to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// `https://` only.
    #[default]
    TlsOnly,
    /// Also accept `http://`, for receivers addressed as `host:port` on a
    /// trusted network.
    AllowInsecureHttp,
}

/// Per-client settings collected by the builder.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub request_timeout: Duration,
    pub user_agent: String,
    pub transport: TransportSecurity,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
        }
    }
}
