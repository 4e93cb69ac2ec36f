//! Outbound delivery of segments

mod http_sink;

pub use http_sink::HttpSegmentSink;
