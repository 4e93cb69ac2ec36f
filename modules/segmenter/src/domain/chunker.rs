//! Fixed-size payload slicing

use std::num::NonZeroUsize;

/// Split `data` into contiguous slices of `size` bytes; the last slice may
/// be shorter. Empty input yields no slices.
///
/// Slices borrow from `data`; nothing is copied.
pub fn split(data: &[u8], size: NonZeroUsize) -> std::slice::Chunks<'_, u8> {
    data.chunks(size.get())
}
