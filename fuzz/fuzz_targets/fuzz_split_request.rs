#![no_main]

use libfuzzer_sys::fuzz_target;
use segmenter::api::rest::SplitRequest;

fuzz_target!(|data: &[u8]| {
    // Inbound body parsing must never panic, whatever the bytes
    if let Ok(req) = serde_json::from_slice::<SplitRequest>(data) {
        let _ = req.time.to_rfc3339();
    }
});
