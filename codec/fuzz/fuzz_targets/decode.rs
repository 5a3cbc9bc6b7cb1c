#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use kwire_codec::{Limits, Record};
use kwire_messages::{envelope::decode_request, ApiKey};
use libfuzzer_sys::fuzz_target;

// Keep allocations bounded so the fuzzer spends its time on structure.
const LIMITS: Limits = Limits::DEFAULT
    .with_max_array_len(64)
    .with_max_bytes_len(1024)
    .with_max_tagged_fields(16);

#[derive(Arbitrary, Debug)]
struct FuzzInput<'a> {
    api_key: u8,
    version: i16,
    request: bool,
    data: &'a [u8],
}

fn fuzz(input: FuzzInput) {
    let key = ApiKey::ALL[input.api_key as usize % ApiKey::ALL.len()];
    let schema = if input.request {
        key.request_schema()
    } else {
        key.response_schema()
    };
    let data = Bytes::copy_from_slice(input.data);

    // Arbitrary bytes must never panic, as a body or as a full request.
    let _ = decode_request(data.clone(), LIMITS);
    let Ok(record) = Record::decode_with(schema, data, input.version, LIMITS) else {
        return;
    };

    // Anything accepted must re-encode, and re-encoding is a fixed point. The first encoding
    // may differ from the input: varints can be non-canonical, default-valued tags are dropped,
    // and tags are written sorted.
    let encoded = record
        .encode(input.version)
        .expect("Failed to encode decoded record!")
        .freeze();
    assert_eq!(encoded.len(), record.encode_size(input.version).unwrap());
    let decoded = Record::decode_with(schema, encoded.clone(), input.version, LIMITS)
        .expect("Failed to decode re-encoded record!");
    let reencoded = decoded
        .encode(input.version)
        .expect("Failed to encode re-decoded record!");
    assert_eq!(encoded[..], reencoded[..]);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
