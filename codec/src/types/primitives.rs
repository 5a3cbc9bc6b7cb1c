//! Codec implementations for fixed-width primitives.
//!
//! All integers and floats are written big-endian. `bool` occupies a single byte and only `0`
//! and `1` are accepted when reading. A UUID is its 16 raw bytes, with no textual form on the
//! wire.
//!
//! None of these types depend on the [`Context`]: their encoding is identical in legacy and
//! flexible versions.

use crate::{util::at_least, Context, Error, FixedSize, Read, Write};
use bytes::{Buf, BufMut};
use uuid::Uuid;

// Numeric types implementation
macro_rules! impl_numeric {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Write for $type {
            #[inline]
            fn write(&self, buf: &mut impl BufMut, _: &Context) -> Result<(), Error> {
                buf.$write_method(*self);
                Ok(())
            }
        }

        impl Read for $type {
            #[inline]
            fn read(buf: &mut impl Buf, _: &Context) -> Result<Self, Error> {
                at_least(buf, std::mem::size_of::<$type>())?;
                Ok(buf.$read_method())
            }
        }

        impl FixedSize for $type {
            const SIZE: usize = std::mem::size_of::<$type>();
        }
    };
}

impl_numeric!(i8, get_i8, put_i8);
impl_numeric!(i16, get_i16, put_i16);
impl_numeric!(i32, get_i32, put_i32);
impl_numeric!(i64, get_i64, put_i64);
impl_numeric!(u16, get_u16, put_u16);
impl_numeric!(u32, get_u32, put_u32);
impl_numeric!(f64, get_f64, put_f64);

// Bool implementation
impl Write for bool {
    #[inline]
    fn write(&self, buf: &mut impl BufMut, _: &Context) -> Result<(), Error> {
        buf.put_u8(u8::from(*self));
        Ok(())
    }
}

impl Read for bool {
    #[inline]
    fn read(buf: &mut impl Buf, _: &Context) -> Result<Self, Error> {
        at_least(buf, 1)?;
        match buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidBool(other)),
        }
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;
}

// UUID implementation
impl Write for Uuid {
    #[inline]
    fn write(&self, buf: &mut impl BufMut, _: &Context) -> Result<(), Error> {
        buf.put_slice(self.as_bytes());
        Ok(())
    }
}

impl Read for Uuid {
    #[inline]
    fn read(buf: &mut impl Buf, _: &Context) -> Result<Self, Error> {
        at_least(buf, Self::SIZE)?;
        let mut dst = [0u8; 16];
        buf.copy_to_slice(&mut dst);
        Ok(Uuid::from_bytes(dst))
    }
}

impl FixedSize for Uuid {
    const SIZE: usize = 16;
}
