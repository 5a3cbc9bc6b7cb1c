//! Codec for repeated elements.
//!
//! The element codec is supplied by the caller, so arrays of primitives and arrays of nested
//! records share the same length handling. Legacy versions use an `int32` count, flexible
//! versions the compact `count + 1` varint.

use crate::{
    types::{len_size, read_len, read_non_null_len, write_len, write_null_len, Nullable, Prefix},
    Context, EncodeSize, Error, Read, Write,
};
use bytes::{Buf, BufMut};

/// Writes a non-null array, delegating each element to `write_item`.
pub fn write_array<B: BufMut, T>(
    buf: &mut B,
    cx: &Context,
    items: &[T],
    mut write_item: impl FnMut(&mut B, &T) -> Result<(), Error>,
) -> Result<(), Error> {
    write_len(buf, cx, Prefix::Int32, items.len())?;
    for item in items {
        write_item(buf, item)?;
    }
    Ok(())
}

/// Writes an array that may be null.
pub fn write_nullable_array<B: BufMut, T>(
    buf: &mut B,
    cx: &Context,
    items: Option<&[T]>,
    write_item: impl FnMut(&mut B, &T) -> Result<(), Error>,
) -> Result<(), Error> {
    match items {
        Some(items) => write_array(buf, cx, items, write_item),
        None => {
            write_null_array(buf, cx);
            Ok(())
        }
    }
}

/// Writes the null array sentinel.
pub fn write_null_array(buf: &mut impl BufMut, cx: &Context) {
    write_null_len(buf, cx, Prefix::Int32);
}

/// Returns the size of the count prefix for an array of `len` elements (`None` for null).
pub fn array_prefix_size(cx: &Context, len: Option<usize>) -> usize {
    len_size(cx, Prefix::Int32, len)
}

fn read_items<B: Buf, T>(
    buf: &mut B,
    cx: &Context,
    len: usize,
    mut read_item: impl FnMut(&mut B) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    cx.limits().check_array_len(len)?;

    // Every element occupies at least one byte in practice, but an empty record does not, so
    // the count is only trusted up to what the buffer could hold.
    let mut items = Vec::with_capacity(len.min(buf.remaining()));
    for _ in 0..len {
        items.push(read_item(buf)?);
    }
    Ok(items)
}

/// Reads a non-null array, delegating each element to `read_item`.
pub fn read_array<B: Buf, T>(
    buf: &mut B,
    cx: &Context,
    read_item: impl FnMut(&mut B) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let len = read_non_null_len(buf, cx, Prefix::Int32)?;
    read_items(buf, cx, len, read_item)
}

/// Reads an array that may be null.
pub fn read_nullable_array<B: Buf, T>(
    buf: &mut B,
    cx: &Context,
    read_item: impl FnMut(&mut B) -> Result<T, Error>,
) -> Result<Option<Vec<T>>, Error> {
    match read_len(buf, cx, Prefix::Int32)? {
        Some(len) => read_items(buf, cx, len, read_item).map(Some),
        None => Ok(None),
    }
}

// Vec implementation
impl<T: Write> Write for Vec<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut, cx: &Context) -> Result<(), Error> {
        write_array(buf, cx, self, |buf, item| item.write(buf, cx))
    }
}

impl<T: EncodeSize> EncodeSize for Vec<T> {
    #[inline]
    fn encode_size(&self, cx: &Context) -> usize {
        array_prefix_size(cx, Some(self.len()))
            + self.iter().map(|item| item.encode_size(cx)).sum::<usize>()
    }
}

impl<T: Read> Read for Vec<T> {
    #[inline]
    fn read(buf: &mut impl Buf, cx: &Context) -> Result<Self, Error> {
        read_array(buf, cx, |buf| T::read(buf, cx))
    }
}

impl<T: Read> Nullable for Vec<T> {
    #[inline]
    fn write_null(buf: &mut impl BufMut, cx: &Context) {
        write_null_array(buf, cx);
    }

    #[inline]
    fn null_size(cx: &Context) -> usize {
        array_prefix_size(cx, None)
    }

    #[inline]
    fn read_nullable(buf: &mut impl Buf, cx: &Context) -> Result<Option<Self>, Error> {
        read_nullable_array(buf, cx, |buf| T::read(buf, cx))
    }
}
