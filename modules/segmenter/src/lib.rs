//! Segmenter module
//!
//! Splits an inbound text payload into fixed-size byte chunks and relays each
//! chunk downstream as its own JSON segment, strictly in order.
//!
//! - [`domain`] holds the chunker, the segment envelope and the relay service
//! - [`infra`] holds the HTTP delivery sink built on `relay-http`
//! - [`api`] exposes the REST surface (`POST <route_path>`, `GET /health`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

pub use config::{ConfigError, SegmenterConfig, SegmenterSettings};
pub use domain::{
    DeliveryError, DomainError, InboundMessage, Segment, SegmentEncoding, SegmentSink,
    SegmentationService, ServiceConfig,
};
pub use infra::delivery::HttpSegmentSink;
