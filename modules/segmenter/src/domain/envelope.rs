//! Wraps chunks into outbound [`Segment`] envelopes

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, FixedOffset};

use crate::domain::error::DomainError;
use crate::domain::model::{Segment, SegmentEncoding};

/// Build one segment per chunk, all sharing `time` and the total count.
///
/// Every envelope is built before anything is sent, so an encoding failure
/// rejects the whole message.
///
/// # Errors
/// `ChunkSplitsCharacter` when text encoding meets a chunk that is not valid
/// UTF-8 on its own.
pub fn build_segments<'a, I>(
    chunks: I,
    time: DateTime<FixedOffset>,
    encoding: SegmentEncoding,
) -> Result<Vec<Segment>, DomainError>
where
    I: ExactSizeIterator<Item = &'a [u8]>,
{
    let count = chunks.len();
    chunks
        .enumerate()
        .map(|(ordinal, chunk)| -> Result<Segment, DomainError> {
            Ok(Segment {
                data: encode_chunk(chunk, ordinal, encoding)?,
                time,
                ordinal,
                count,
            })
        })
        .collect()
}

fn encode_chunk(
    chunk: &[u8],
    ordinal: usize,
    encoding: SegmentEncoding,
) -> Result<String, DomainError> {
    match encoding {
        SegmentEncoding::Text => std::str::from_utf8(chunk)
            .map(str::to_owned)
            .map_err(|_| DomainError::ChunkSplitsCharacter { ordinal }),
        SegmentEncoding::Base64 => Ok(STANDARD.encode(chunk)),
    }
}
