//! Error types for codec operations

use crate::{Version, Versions};
use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{schema} does not support version {version} (supported: {supported})")]
    UnsupportedVersion {
        schema: &'static str,
        version: Version,
        supported: Versions,
    },
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("invalid length: {0}")]
    InvalidLength(i64),
    #[error("varint overflow")]
    VarintOverflow,
    #[error("invalid bool: {0}")]
    InvalidBool(u8),
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    #[error("invalid data in {0}: {1}")]
    InvalidData(&'static str, String), // context, message
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("length {0} does not fit the length prefix")]
    LengthOverflow(usize),
    #[error("type mismatch in {field}: expected {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{0} is not nullable at version {1}")]
    NullValue(&'static str, Version),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid schema {0}: {1}")]
    InvalidSchema(&'static str, String),
}
