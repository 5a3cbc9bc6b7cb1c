//! Codec implementations for wire types.
//!
//! # Length prefixes
//!
//! Strings, byte buffers, and arrays are preceded by their length. The form of that prefix is
//! chosen by the [`Context`], never by the value:
//!
//! | Form    | Prefix                               | Null sentinel |
//! |---------|--------------------------------------|---------------|
//! | Legacy  | `int16` (strings), `int32` (others)  | `-1`          |
//! | Compact | unsigned varint of `length + 1`      | `0`           |
//!
//! Types that have a null sentinel implement [`Nullable`], which in turn gives `Option<T>` its
//! [`Write`], [`EncodeSize`], and [`Read`] implementations. A non-nullable read that meets the
//! null sentinel fails with [`Error::InvalidLength`].

use crate::{varint, Context, EncodeSize, Error, Read, Write};
use ::bytes::{Buf, BufMut};

pub mod array;
pub mod bytes;
pub mod primitives;
pub mod string;

/// Width of the length prefix in legacy (non-flexible) versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Prefix {
    Int16,
    Int32,
}

impl Prefix {
    const fn size(self) -> usize {
        match self {
            Self::Int16 => 2,
            Self::Int32 => 4,
        }
    }
}

/// Writes the length prefix for a non-null value of `len` units.
pub(crate) fn write_len(
    buf: &mut impl BufMut,
    cx: &Context,
    prefix: Prefix,
    len: usize,
) -> Result<(), Error> {
    if cx.flexible() {
        let compact = u32::try_from(len)
            .ok()
            .and_then(|len| len.checked_add(1))
            .ok_or(Error::LengthOverflow(len))?;
        varint::write(compact, buf);
        return Ok(());
    }
    match prefix {
        Prefix::Int16 => buf.put_i16(i16::try_from(len).map_err(|_| Error::LengthOverflow(len))?),
        Prefix::Int32 => buf.put_i32(i32::try_from(len).map_err(|_| Error::LengthOverflow(len))?),
    }
    Ok(())
}

/// Writes the null sentinel.
pub(crate) fn write_null_len(buf: &mut impl BufMut, cx: &Context, prefix: Prefix) {
    if cx.flexible() {
        varint::write(0u32, buf);
        return;
    }
    match prefix {
        Prefix::Int16 => buf.put_i16(-1),
        Prefix::Int32 => buf.put_i32(-1),
    }
}

/// Returns the size of the length prefix for `len` units (`None` for null).
pub(crate) fn len_size(cx: &Context, prefix: Prefix, len: Option<usize>) -> usize {
    if !cx.flexible() {
        return prefix.size();
    }
    match len {
        // Lengths past u32 fail in `write_len`; the size is irrelevant then.
        Some(len) => varint::size(u32::try_from(len).unwrap_or(u32::MAX).saturating_add(1)),
        None => 1,
    }
}

/// Reads a length prefix, returning `None` for the null sentinel.
pub(crate) fn read_len(
    buf: &mut impl Buf,
    cx: &Context,
    prefix: Prefix,
) -> Result<Option<usize>, Error> {
    let len = if cx.flexible() {
        i64::from(varint::read::<u32>(buf)?) - 1
    } else {
        match prefix {
            Prefix::Int16 => i64::from(i16::read(buf, cx)?),
            Prefix::Int32 => i64::from(i32::read(buf, cx)?),
        }
    };
    match len {
        -1 => Ok(None),
        len if len < -1 => Err(Error::InvalidLength(len)),
        len => usize::try_from(len)
            .map(Some)
            .map_err(|_| Error::InvalidLength(len)),
    }
}

/// Reads a length prefix that must not be the null sentinel.
pub(crate) fn read_non_null_len(
    buf: &mut impl Buf,
    cx: &Context,
    prefix: Prefix,
) -> Result<usize, Error> {
    read_len(buf, cx, prefix)?.ok_or(Error::InvalidLength(-1))
}

/// Trait for types that have a null sentinel on the wire.
///
/// Whether a given field may be null is decided by its descriptor; this trait only knows how
/// the sentinel is written.
pub trait Nullable: Sized {
    /// Writes the null sentinel for this type.
    fn write_null(buf: &mut impl BufMut, cx: &Context);

    /// Returns the size of the null sentinel.
    fn null_size(cx: &Context) -> usize;

    /// Reads a value that may be null.
    fn read_nullable(buf: &mut impl Buf, cx: &Context) -> Result<Option<Self>, Error>;
}

// Option implementation
impl<T: Nullable + Write> Write for Option<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut, cx: &Context) -> Result<(), Error> {
        match self {
            Some(inner) => inner.write(buf, cx),
            None => {
                T::write_null(buf, cx);
                Ok(())
            }
        }
    }
}

impl<T: Nullable + EncodeSize> EncodeSize for Option<T> {
    #[inline]
    fn encode_size(&self, cx: &Context) -> usize {
        match self {
            Some(inner) => inner.encode_size(cx),
            None => T::null_size(cx),
        }
    }
}

impl<T: Nullable> Read for Option<T> {
    #[inline]
    fn read(buf: &mut impl Buf, cx: &Context) -> Result<Self, Error> {
        T::read_nullable(buf, cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::bytes::Bytes;

    const LEGACY: Context = Context::new(0, false);
    const FLEXIBLE: Context = Context::new(0, true);

    #[test]
    fn test_legacy_prefixes() {
        let mut buf = Vec::new();
        write_len(&mut buf, &LEGACY, Prefix::Int16, 3).unwrap();
        write_len(&mut buf, &LEGACY, Prefix::Int32, 3).unwrap();
        write_null_len(&mut buf, &LEGACY, Prefix::Int16);
        write_null_len(&mut buf, &LEGACY, Prefix::Int32);
        assert_eq!(
            buf,
            [0x00, 0x03, 0x00, 0x00, 0x00, 0x03, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );

        let mut reader = &buf[..];
        assert_eq!(read_len(&mut reader, &LEGACY, Prefix::Int16), Ok(Some(3)));
        assert_eq!(read_len(&mut reader, &LEGACY, Prefix::Int32), Ok(Some(3)));
        assert_eq!(read_len(&mut reader, &LEGACY, Prefix::Int16), Ok(None));
        assert_eq!(read_len(&mut reader, &LEGACY, Prefix::Int32), Ok(None));
    }

    #[test]
    fn test_compact_prefixes() {
        let mut buf = Vec::new();
        write_null_len(&mut buf, &FLEXIBLE, Prefix::Int16);
        write_len(&mut buf, &FLEXIBLE, Prefix::Int16, 0).unwrap();
        write_len(&mut buf, &FLEXIBLE, Prefix::Int32, 127).unwrap();
        assert_eq!(buf, [0x00, 0x01, 0x80, 0x01]);
        assert_eq!(len_size(&FLEXIBLE, Prefix::Int32, Some(127)), 2);
        assert_eq!(len_size(&FLEXIBLE, Prefix::Int32, None), 1);

        let mut reader = &buf[..];
        assert_eq!(read_len(&mut reader, &FLEXIBLE, Prefix::Int16), Ok(None));
        assert_eq!(read_len(&mut reader, &FLEXIBLE, Prefix::Int16), Ok(Some(0)));
        assert_eq!(read_len(&mut reader, &FLEXIBLE, Prefix::Int32), Ok(Some(127)));
    }

    #[test]
    fn test_invalid_lengths() {
        let mut buf = Bytes::from_static(&[0xFF, 0xFE]);
        assert_eq!(
            read_len(&mut buf, &LEGACY, Prefix::Int16),
            Err(Error::InvalidLength(-2))
        );

        let mut buf = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(
            read_non_null_len(&mut buf, &LEGACY, Prefix::Int32),
            Err(Error::InvalidLength(-1))
        );

        let mut buf = Bytes::from_static(&[0x00]);
        assert_eq!(
            read_non_null_len(&mut buf, &FLEXIBLE, Prefix::Int32),
            Err(Error::InvalidLength(-1))
        );
    }

    #[test]
    fn test_legacy_overflow() {
        let mut buf = Vec::new();
        assert_eq!(
            write_len(&mut buf, &LEGACY, Prefix::Int16, 40_000),
            Err(Error::LengthOverflow(40_000))
        );
        assert!(buf.is_empty());
    }
}
