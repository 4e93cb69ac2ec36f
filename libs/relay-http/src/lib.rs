#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Outbound HTTP client for the segment relay
//!
//! A hyper client behind a tower stack with:
//! - TLS via rustls and the Mozilla root set (HTTPS only unless plain HTTP
//!   is explicitly allowed)
//! - Connection pooling shared by every clone of the client
//! - A per-request timeout
//! - User-Agent header injection
//! - A cap on response body reads
//!
//! There is no retry layer: a failed send is reported to the caller
//! exactly once.
//!
//! ```ignore
//! use relay_http::HttpClientBuilder;
//! use std::time::Duration;
//!
//! let client = HttpClientBuilder::new()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let resp = client
//!     .post("https://receiver.example.com/api/delivery/")
//!     .json(&segment)?
//!     .send()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse};
