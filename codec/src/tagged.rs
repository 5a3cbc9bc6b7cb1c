//! The tagged field section of flexible versions.
//!
//! Every struct encoded in a flexible version ends with:
//!
//! ```text
//! varint count, then count * (varint tag, varint length, payload)
//! ```
//!
//! The length prefix is what keeps old readers aligned: a tag they do not recognize is
//! consumed by length and retained as a [`RawTaggedField`], so every later entry (and every
//! later field) is still read from the right offset.

use crate::{util::at_least, varint, Context, EncodeSize, Error, Read, Write};
use bytes::{Buf, BufMut, Bytes};

/// A tagged field carried as opaque bytes.
///
/// Tags that the schema does not know at the decoded version end up here, and are written back
/// unchanged when the record is encoded again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawTaggedField {
    pub tag: u32,
    pub data: Bytes,
}

impl RawTaggedField {
    pub fn new(tag: u32, data: impl Into<Bytes>) -> Self {
        Self {
            tag,
            data: data.into(),
        }
    }
}

/// Writes the header of one entry: its tag and payload length.
pub fn write_entry_header(buf: &mut impl BufMut, tag: u32, len: usize) -> Result<(), Error> {
    let len = u32::try_from(len).map_err(|_| Error::LengthOverflow(len))?;
    varint::write(tag, buf);
    varint::write(len, buf);
    Ok(())
}

/// Returns the size of an entry header.
pub fn entry_header_size(tag: u32, len: usize) -> usize {
    varint::size(tag) + varint::size(u32::try_from(len).unwrap_or(u32::MAX))
}

/// Writes the entry count that opens the section.
pub fn write_count(buf: &mut impl BufMut, count: usize) -> Result<(), Error> {
    let count = u32::try_from(count).map_err(|_| Error::LengthOverflow(count))?;
    varint::write(count, buf);
    Ok(())
}

/// Returns the size of the entry count.
pub fn count_size(count: usize) -> usize {
    varint::size(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Reads the entry count that opens the section, checked against the limits.
pub fn read_count(buf: &mut impl Buf, cx: &Context) -> Result<usize, Error> {
    let count = varint::read::<u32>(buf)? as usize;
    cx.limits().check_tagged_fields(count)?;
    Ok(count)
}

impl Write for RawTaggedField {
    fn write(&self, buf: &mut impl BufMut, _: &Context) -> Result<(), Error> {
        write_entry_header(buf, self.tag, self.data.len())?;
        buf.put_slice(&self.data);
        Ok(())
    }
}

impl EncodeSize for RawTaggedField {
    fn encode_size(&self, _: &Context) -> usize {
        entry_header_size(self.tag, self.data.len()) + self.data.len()
    }
}

impl Read for RawTaggedField {
    fn read(buf: &mut impl Buf, cx: &Context) -> Result<Self, Error> {
        let tag = varint::read::<u32>(buf)?;
        let len = varint::read::<u32>(buf)? as usize;
        cx.limits().check_bytes_len(len)?;
        at_least(buf, len)?;
        Ok(Self {
            tag,
            data: buf.copy_to_bytes(len),
        })
    }
}
