//! Utility functions for buffer management.

use crate::Error;
use bytes::Buf;

/// Checks that the buffer holds at least `len` more bytes.
#[inline]
pub(crate) fn at_least<B: Buf>(buf: &mut B, len: usize) -> Result<(), Error> {
    let remaining = buf.remaining();
    if remaining < len {
        return Err(Error::Truncated {
            needed: len,
            remaining,
        });
    }
    Ok(())
}
