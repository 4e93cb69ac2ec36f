//! Static error definitions (`ErrDef`) shared by the relay's REST surface

use crate::problem::Problem;
use http::StatusCode;

/// Static error definition from catalog
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    /// Convert this error definition into a Problem with the given detail
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        // Invalid codes in a catalog entry degrade to 500
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Problem::new(status, self.title, detail.into())
            .with_code(self.code)
            .with_type(self.type_url)
    }
}

/// Request body could not be parsed into an inbound message.
pub const MALFORMED_REQUEST: ErrDef = ErrDef {
    status: 400,
    title: "Malformed Request",
    code: "SEGMENTER_MALFORMED_REQUEST",
    type_url: "https://errors.segment-relay.dev/SEGMENTER_MALFORMED_REQUEST",
};

/// A downstream segment delivery failed; earlier segments may have been delivered.
pub const DELIVERY_FAILED: ErrDef = ErrDef {
    status: 500,
    title: "Delivery Failed",
    code: "SEGMENTER_DELIVERY_FAILED",
    type_url: "https://errors.segment-relay.dev/SEGMENTER_DELIVERY_FAILED",
};

/// Request body exceeded the configured size limit.
pub const PAYLOAD_TOO_LARGE: ErrDef = ErrDef {
    status: 413,
    title: "Payload Too Large",
    code: "SEGMENTER_PAYLOAD_TOO_LARGE",
    type_url: "https://errors.segment-relay.dev/SEGMENTER_PAYLOAD_TOO_LARGE",
};
