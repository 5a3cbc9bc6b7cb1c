//! Codec implementations for byte buffers.
//!
//! Same shape as strings, except the legacy prefix is an `int32` and the payload is opaque.

use crate::{
    types::{len_size, read_len, read_non_null_len, write_len, write_null_len, Nullable, Prefix},
    util::at_least,
    Context, EncodeSize, Error, Read, Write,
};
use bytes::{Buf, BufMut, Bytes};

fn read_payload(buf: &mut impl Buf, cx: &Context, len: usize) -> Result<Bytes, Error> {
    cx.limits().check_bytes_len(len)?;
    at_least(buf, len)?;
    Ok(buf.copy_to_bytes(len))
}

impl Write for Bytes {
    #[inline]
    fn write(&self, buf: &mut impl BufMut, cx: &Context) -> Result<(), Error> {
        write_len(buf, cx, Prefix::Int32, self.len())?;
        buf.put_slice(self);
        Ok(())
    }
}

impl EncodeSize for Bytes {
    #[inline]
    fn encode_size(&self, cx: &Context) -> usize {
        len_size(cx, Prefix::Int32, Some(self.len())) + self.len()
    }
}

impl Read for Bytes {
    #[inline]
    fn read(buf: &mut impl Buf, cx: &Context) -> Result<Self, Error> {
        let len = read_non_null_len(buf, cx, Prefix::Int32)?;
        read_payload(buf, cx, len)
    }
}

impl Nullable for Bytes {
    #[inline]
    fn write_null(buf: &mut impl BufMut, cx: &Context) {
        write_null_len(buf, cx, Prefix::Int32);
    }

    #[inline]
    fn null_size(cx: &Context) -> usize {
        len_size(cx, Prefix::Int32, None)
    }

    #[inline]
    fn read_nullable(buf: &mut impl Buf, cx: &Context) -> Result<Option<Self>, Error> {
        match read_len(buf, cx, Prefix::Int32)? {
            Some(len) => read_payload(buf, cx, len).map(Some),
            None => Ok(None),
        }
    }
}
