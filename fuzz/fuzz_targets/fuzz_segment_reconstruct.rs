#![no_main]

use std::num::NonZeroUsize;

use chrono::DateTime;
use libfuzzer_sys::fuzz_target;
use segmenter::SegmentEncoding;
use segmenter::domain::chunker::split;
use segmenter::domain::envelope::build_segments;

fuzz_target!(|data: &[u8]| {
    let Some((&size, payload)) = data.split_first() else {
        return;
    };
    let Some(size) = NonZeroUsize::new(usize::from(size)) else {
        return;
    };
    let Ok(time) = DateTime::parse_from_rfc3339("2024-02-28T01:01:01Z") else {
        return;
    };

    let chunks: Vec<&[u8]> = split(payload, size).collect();
    assert_eq!(chunks.concat(), payload);

    if let Ok(segments) = build_segments(split(payload, size), time, SegmentEncoding::Text) {
        let rebuilt: String = segments.iter().map(|s| s.data.as_str()).collect();
        assert_eq!(rebuilt.as_bytes(), payload);
        assert!(segments.iter().enumerate().all(|(i, s)| s.ordinal == i && s.count == chunks.len()));
    }
});
