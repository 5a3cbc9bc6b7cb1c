#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use kwire_codec::{varint, Context, Decode, Encode, Error, Limits};
use libfuzzer_sys::fuzz_target;
use uuid::Uuid;

fn roundtrip<T>(v: T, cx: &Context)
where
    T: Encode + Decode + PartialEq + std::fmt::Debug,
{
    let encoded = v.encode(cx).expect("Failed to encode!");
    assert_eq!(v.encode_size(cx), encoded.len());
    let decoded = T::decode(encoded, cx).expect("Failed to decode!");
    assert_eq!(v, decoded);
}

// NOTE: Separate float case to handle NaN comparisons
fn roundtrip_f64(v: f64, cx: &Context) {
    let encoded = v.encode(cx).expect("Failed to encode f64!");
    let decoded = f64::decode(encoded, cx).expect("Failed to decode f64!");
    if v.is_nan() && decoded.is_nan() {
        return;
    }
    assert_eq!(v, decoded);
}

fn roundtrip_bytes(input: Bytes, cx: &Context) {
    let len = input.len();
    let encoded = input.encode(cx).expect("Failed to encode bytes!");

    // Decode with too small a limit
    if len > 0 {
        let limited = cx.with_limits(Limits::DEFAULT.with_max_bytes_len(len - 1));
        assert!(matches!(
            Bytes::decode(encoded.clone(), &limited),
            Err(Error::LengthExceeded(..))
        ));
    }

    let decoded = Bytes::decode(encoded, cx).expect("Failed to decode bytes!");
    assert_eq!(input, decoded);
}

fn roundtrip_varint(v: u32) {
    let mut buf = Vec::new();
    varint::write(v, &mut buf);
    assert_eq!(buf.len(), varint::size(v));
    let decoded: u32 = varint::read(&mut &buf[..]).expect("Failed to decode varint!");
    assert_eq!(v, decoded);
}

fn decode_varint(input: &[u8]) {
    // Must fail cleanly on overflow and truncation, never panic.
    let _ = varint::read::<u32>(&mut &input[..]);
    let _ = varint::read::<u64>(&mut &input[..]);
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    Bytes(&'a [u8]),
    NullableBytes(Option<&'a [u8]>),
    String(String),
    NullableString(Option<String>),
    Strings(Vec<String>),
    NullableInts(Option<Vec<i32>>),
    Uuid(u128),

    VarInt(u32),
    VarIntInput(&'a [u8]),

    // Primitive inputs!
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U16(u16),
    U32(u32),
    F64(f64),
}

fn fuzz((flexible, input): (bool, FuzzInput)) {
    let cx = Context::new(0, flexible);
    let cx = &cx;
    match input {
        FuzzInput::Bytes(it) => roundtrip_bytes(Bytes::copy_from_slice(it), cx),
        FuzzInput::NullableBytes(it) => roundtrip(it.map(Bytes::copy_from_slice), cx),
        FuzzInput::String(it) => {
            // Legacy strings carry an int16 length.
            if flexible || it.len() <= i16::MAX as usize {
                roundtrip(it, cx)
            }
        }
        FuzzInput::NullableString(it) => {
            if flexible || it.as_ref().map_or(0, String::len) <= i16::MAX as usize {
                roundtrip(it, cx)
            }
        }
        FuzzInput::Strings(it) => {
            if flexible || it.iter().all(|s| s.len() <= i16::MAX as usize) {
                roundtrip(it, cx)
            }
        }
        FuzzInput::NullableInts(it) => roundtrip(it, cx),
        FuzzInput::Uuid(it) => roundtrip(Uuid::from_u128(it), cx),

        FuzzInput::VarInt(it) => roundtrip_varint(it),
        FuzzInput::VarIntInput(it) => decode_varint(it),

        FuzzInput::Bool(it) => roundtrip(it, cx),
        FuzzInput::I8(it) => roundtrip(it, cx),
        FuzzInput::I16(it) => roundtrip(it, cx),
        FuzzInput::I32(it) => roundtrip(it, cx),
        FuzzInput::I64(it) => roundtrip(it, cx),
        FuzzInput::U16(it) => roundtrip(it, cx),
        FuzzInput::U32(it) => roundtrip(it, cx),
        FuzzInput::F64(it) => roundtrip_f64(it, cx),
    };
}

fuzz_target!(|input: (bool, FuzzInput)| {
    fuzz(input);
});
