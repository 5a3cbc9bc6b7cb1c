//! Kafka message schemas for [`kwire_codec`].
//!
//! Each message is a pair of static [`Schema`](kwire_codec::Schema) tables (request and
//! response) registered under its [`ApiKey`]. The key also derives the header versions that
//! frame the message, and [`envelope`] encodes and decodes a header together with its body.
//!
//! # Example
//!
//! ```
//! use kwire_messages::{
//!     envelope::{decode_request, encode_request, RequestHeader},
//!     ApiKey,
//! };
//! use kwire_codec::{Limits, Record, Value};
//!
//! let body = Record::new(ApiKey::Heartbeat.request_schema())
//!     .with("group_id", "payments")?
//!     .with("generation_id", 4i32)?
//!     .with("member_id", "consumer-1")?;
//! let header = RequestHeader {
//!     api_key: ApiKey::Heartbeat,
//!     api_version: 4,
//!     correlation_id: 1,
//!     client_id: Some("billing".to_string()),
//! };
//!
//! let frame = encode_request(&header, &body)?.freeze();
//! let request = decode_request(frame, Limits::DEFAULT)?;
//! assert_eq!(request.header, header);
//! assert_eq!(request.body.get("generation_id"), Some(&Value::Int32(4)));
//! # Ok::<(), kwire_codec::Error>(())
//! ```

pub mod admin;
pub mod api;
pub mod api_versions;
pub mod envelope;
pub mod group;
pub mod header;

pub use api::ApiKey;
pub use kwire_codec::Error;
