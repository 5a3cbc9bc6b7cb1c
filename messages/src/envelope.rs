//! Requests and responses: a header followed by a message body.
//!
//! The header version is derived from the API key and the body version, and a request is
//! dispatched to its body schema by the key and version found at the start of its header. The
//! size prefix that frames each envelope on a connection belongs to the transport and is not
//! handled here.

use crate::{
    header::{REQUEST_HEADER, RESPONSE_HEADER},
    ApiKey,
};
use bytes::{Bytes, BytesMut};
use kwire_codec::{Context, Error, Limits, Read, Record, Schema, Value, Version};
use std::ptr;
use tracing::trace;

/// The header of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestHeader {
    pub api_key: ApiKey,
    pub api_version: Version,
    pub correlation_id: i32,
    pub client_id: Option<String>,
}

impl RequestHeader {
    /// The header version this header is encoded with.
    pub fn version(&self) -> Version {
        self.api_key.request_header_version(self.api_version)
    }

    fn to_record(&self) -> Result<Record, Error> {
        Record::new(&REQUEST_HEADER)
            .with("request_api_key", self.api_key.id())?
            .with("request_api_version", self.api_version)?
            .with("correlation_id", self.correlation_id)?
            .with("client_id", self.client_id.clone())
    }
}

/// A decoded request.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub header: RequestHeader,
    pub body: Record,
}

/// A decoded response.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub correlation_id: i32,
    pub body: Record,
}

fn check_body(body: &Record, expected: &'static Schema) -> Result<(), Error> {
    if ptr::eq(body.schema(), expected) {
        return Ok(());
    }
    Err(Error::InvalidData(
        expected.name(),
        format!("body is a {}", body.schema().name()),
    ))
}

fn correlation_id(header: &Record) -> Result<i32, Error> {
    header
        .get("correlation_id")
        .and_then(Value::as_i32)
        .copied()
        .ok_or(Error::TypeMismatch {
            field: "correlation_id",
            expected: "int32",
        })
}

fn encode_envelope(
    header: &Record,
    header_version: Version,
    body: &Record,
    version: Version,
) -> Result<BytesMut, Error> {
    let len = header.encode_size(header_version)? + body.encode_size(version)?;
    let mut buffer = BytesMut::with_capacity(len);
    header.write(&mut buffer, header_version)?;
    body.write(&mut buffer, version)?;
    assert_eq!(buffer.len(), len, "envelope did not write expected bytes");
    Ok(buffer)
}

/// Encodes a request header and its body.
pub fn encode_request(header: &RequestHeader, body: &Record) -> Result<BytesMut, Error> {
    check_body(body, header.api_key.request_schema())?;
    encode_envelope(&header.to_record()?, header.version(), body, header.api_version)
}

/// Decodes a request, selecting the body schema from the key and version in its header.
pub fn decode_request(mut frame: Bytes, limits: Limits) -> Result<Request, Error> {
    // Key and version lead every header version.
    let mut peek = frame.clone();
    let cx = Context::new(0, false);
    let api_key = ApiKey::try_from(i16::read(&mut peek, &cx)?)?;
    let api_version = i16::read(&mut peek, &cx)?;
    let schema = api_key.request_schema();
    schema.check_version(api_version)?;

    let header_version = api_key.request_header_version(api_version);
    let header = Record::read_with(&REQUEST_HEADER, &mut frame, header_version, limits)?;
    let header = RequestHeader {
        api_key,
        api_version,
        correlation_id: correlation_id(&header)?,
        client_id: header
            .get("client_id")
            .and_then(Value::as_str)
            .map(str::to_string),
    };
    let body = Record::decode_with(schema, frame, api_version, limits)?;
    trace!(
        api_key = %api_key,
        api_version,
        correlation_id = header.correlation_id,
        "decoded request"
    );
    Ok(Request { header, body })
}

/// Encodes a response to a request of `api_key` at `version`.
pub fn encode_response(
    api_key: ApiKey,
    version: Version,
    correlation_id: i32,
    body: &Record,
) -> Result<BytesMut, Error> {
    check_body(body, api_key.response_schema())?;
    let header = Record::new(&RESPONSE_HEADER).with("correlation_id", correlation_id)?;
    encode_envelope(
        &header,
        api_key.response_header_version(version),
        body,
        version,
    )
}

/// Decodes the response to a request of `api_key` at `version`.
pub fn decode_response(
    api_key: ApiKey,
    version: Version,
    mut frame: Bytes,
    limits: Limits,
) -> Result<Response, Error> {
    let schema = api_key.response_schema();
    schema.check_version(version)?;
    let header_version = api_key.response_header_version(version);
    let header = Record::read_with(&RESPONSE_HEADER, &mut frame, header_version, limits)?;
    let correlation_id = correlation_id(&header)?;
    let body = Record::decode_with(schema, frame, version, limits)?;
    trace!(api_key = %api_key, version, correlation_id, "decoded response");
    Ok(Response {
        correlation_id,
        body,
    })
}
