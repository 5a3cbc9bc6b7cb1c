//! Codec implementations for UTF-8 strings.
//!
//! Legacy versions prefix the string with an `int16` byte length; flexible versions use the
//! compact `length + 1` varint. `Option<String>` is the nullable variant.

use crate::{
    types::{len_size, read_len, read_non_null_len, write_len, write_null_len, Nullable, Prefix},
    util::at_least,
    Context, EncodeSize, Error, Read, Write,
};
use bytes::{Buf, BufMut};

fn read_utf8(buf: &mut impl Buf, cx: &Context, len: usize) -> Result<String, Error> {
    cx.limits().check_bytes_len(len)?;
    at_least(buf, len)?;
    let mut dst = vec![0u8; len];
    buf.copy_to_slice(&mut dst);
    String::from_utf8(dst).map_err(|_| Error::InvalidUtf8)
}

impl Write for str {
    #[inline]
    fn write(&self, buf: &mut impl BufMut, cx: &Context) -> Result<(), Error> {
        write_len(buf, cx, Prefix::Int16, self.len())?;
        buf.put_slice(self.as_bytes());
        Ok(())
    }
}

impl EncodeSize for str {
    #[inline]
    fn encode_size(&self, cx: &Context) -> usize {
        len_size(cx, Prefix::Int16, Some(self.len())) + self.len()
    }
}

impl Write for String {
    #[inline]
    fn write(&self, buf: &mut impl BufMut, cx: &Context) -> Result<(), Error> {
        self.as_str().write(buf, cx)
    }
}

impl EncodeSize for String {
    #[inline]
    fn encode_size(&self, cx: &Context) -> usize {
        self.as_str().encode_size(cx)
    }
}

impl Read for String {
    #[inline]
    fn read(buf: &mut impl Buf, cx: &Context) -> Result<Self, Error> {
        let len = read_non_null_len(buf, cx, Prefix::Int16)?;
        read_utf8(buf, cx, len)
    }
}

impl Nullable for String {
    #[inline]
    fn write_null(buf: &mut impl BufMut, cx: &Context) {
        write_null_len(buf, cx, Prefix::Int16);
    }

    #[inline]
    fn null_size(cx: &Context) -> usize {
        len_size(cx, Prefix::Int16, None)
    }

    #[inline]
    fn read_nullable(buf: &mut impl Buf, cx: &Context) -> Result<Option<Self>, Error> {
        match read_len(buf, cx, Prefix::Int16)? {
            Some(len) => read_utf8(buf, cx, len).map(Some),
            None => Ok(None),
        }
    }
}
