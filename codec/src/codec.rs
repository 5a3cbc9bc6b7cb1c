//! Core codec traits and implementations

use crate::{error::Error, Limits, Version};
use bytes::{Buf, BufMut, BytesMut};

/// Per-call encoding state shared by every value written or read in one message.
///
/// The flexible flag is computed once from the message schema and never changes while the
/// message is walked, except for fields that override it (see [`crate::Field::flexible_versions`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    version: Version,
    flexible: bool,
    limits: Limits,
}

impl Context {
    /// Creates a context with the default (permissive) decode limits.
    pub const fn new(version: Version, flexible: bool) -> Self {
        Self {
            version,
            flexible,
            limits: Limits::DEFAULT,
        }
    }

    /// Replaces the decode limits.
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns a copy with the flexible flag replaced.
    pub const fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// The protocol version being encoded or decoded.
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Whether compact lengths and tagged fields are in use.
    pub const fn flexible(&self) -> bool {
        self.flexible
    }

    /// The decode limits.
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }
}

/// Trait for types that can be written (encoded) to a buffer.
pub trait Write {
    /// Encodes this value by writing to a buffer.
    ///
    /// Fails only if the value cannot be represented with the length prefix the context selects.
    fn write(&self, buf: &mut impl BufMut, cx: &Context) -> Result<(), Error>;
}

/// Trait for types that can report their encoded size.
pub trait EncodeSize {
    /// Returns the encoded length of this value.
    ///
    /// This method MUST return the exact number of bytes that will be written by `write()`.
    fn encode_size(&self, cx: &Context) -> usize;
}

/// Trait for types that can be read/decoded from a buffer.
pub trait Read: Sized {
    /// Reads a value from the buffer, consuming the necessary bytes.
    ///
    /// Returns an error if decoding fails (e.g., invalid data, not enough bytes).
    fn read(buf: &mut impl Buf, cx: &Context) -> Result<Self, Error>;
}

/// Trait for types with a known, fixed encoded length.
pub trait FixedSize {
    /// The length of the encoded value.
    const SIZE: usize;
}

// Types with a known size never depend on the context.
impl<T: FixedSize> EncodeSize for T {
    #[inline]
    fn encode_size(&self, _: &Context) -> usize {
        Self::SIZE
    }
}

/// Trait for types that can be encoded to a fresh buffer.
pub trait Encode: Write + EncodeSize {
    /// Encodes a value to a `BytesMut` buffer.
    ///
    /// Panics if the `write` implementation does not write the expected number of bytes.
    ///
    /// (Provided method).
    fn encode(&self, cx: &Context) -> Result<BytesMut, Error> {
        let len = self.encode_size(cx);
        let mut buffer = BytesMut::with_capacity(len);
        self.write(&mut buffer, cx)?;
        assert_eq!(buffer.len(), len, "write() did not write expected bytes");
        Ok(buffer)
    }
}

// Automatically implement `Encode` for types that implement `Write` and `EncodeSize`.
impl<T: Write + EncodeSize> Encode for T {}

/// Trait for types that can be decoded from a buffer, ensuring the entire buffer is consumed.
pub trait Decode: Read {
    /// Decodes a value from a buffer, ensuring the buffer is fully consumed.
    ///
    /// (Provided method).
    fn decode(mut buf: impl Buf, cx: &Context) -> Result<Self, Error> {
        let result = Self::read(&mut buf, cx)?;

        // Check that the buffer is fully consumed.
        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }

        Ok(result)
    }
}

// Automatically implement `Decode` for types that implement `Read`.
impl<T: Read> Decode for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    const CX: Context = Context::new(0, false);

    #[test]
    fn test_insufficient_buffer() {
        let mut reader = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(
            i32::read(&mut reader, &CX),
            Err(Error::Truncated {
                needed: 4,
                remaining: 2
            })
        ));
        // Nothing is consumed by a failed fixed-width read.
        assert_eq!(reader.len(), 2);
    }

    #[test]
    fn test_extra_data() {
        let encoded = Bytes::from_static(&[0x01, 0x02]);
        assert!(matches!(i8::decode(encoded, &CX), Err(Error::ExtraData(1))));
    }

    #[test]
    fn test_encode_matches_size() {
        let encoded = 42i64.encode(&CX).unwrap();
        assert_eq!(encoded.len(), 8);
        assert_eq!(i64::decode(encoded, &CX).unwrap(), 42);
    }

    #[test]
    fn test_context_accessors() {
        let limits = Limits::DEFAULT.with_max_array_len(1);
        let cx = Context::new(7, true).with_limits(limits);
        assert_eq!(cx.version(), 7);
        assert!(cx.flexible());
        assert_eq!(cx.limits(), &limits);
        assert!(!cx.with_flexible(false).flexible());
    }
}
