//! Encode and decode versioned Kafka wire protocol messages.
//!
//! # Overview
//!
//! Every message of the protocol is versioned, and its byte layout depends on the version:
//! fields appear and disappear, and from some version on the message switches to the
//! "flexible" encoding (compact varint lengths plus a trailing section of tagged fields that
//! old readers skip). This crate separates the two concerns:
//!
//! - The wire types ([`types`], [`varint`], [`tagged`]) encode single values under a
//!   [`Context`] that carries the version and whether the flexible encoding is in use.
//! - Messages are declared as static [`Schema`] tables and encoded or decoded as [`Record`]s by
//!   one engine that walks the table, so no per-message code is written by hand.
//!
//! # Supported Types
//!
//! - Fixed width: `int8`, `int16`, `int32`, `int64`, `uint16`, `uint32`, `bool`, `float64`,
//!   `uuid`
//! - Length prefixed: `string`, `bytes`, and arrays of any type, each optionally nullable
//! - Nested structs (optionally nullable) and arrays of structs
//! - Tagged fields in flexible versions, with unknown tags retained
//!
//! # Example (Typed)
//!
//! ```
//! use kwire_codec::{Context, Decode, Encode};
//!
//! let legacy = Context::new(0, false);
//! let flexible = Context::new(9, true);
//!
//! let name = Some("client".to_string());
//! assert_eq!(name.encode(&legacy)?.len(), 2 + 6);
//! assert_eq!(name.encode(&flexible)?.len(), 1 + 6);
//!
//! let null = None::<String>.encode(&flexible)?;
//! assert_eq!(null, &[0x00][..]);
//! assert_eq!(Option::<String>::decode(null, &flexible)?, None);
//! # Ok::<(), kwire_codec::Error>(())
//! ```
//!
//! # Example (Schema)
//!
//! ```
//! use kwire_codec::{DefaultValue, Field, FieldType, Record, Schema, Versions};
//!
//! static DESCRIBE: Schema = Schema::new(
//!     "Describe",
//!     Versions::between(0, 3),
//!     Versions::since(2),
//!     &[
//!         Field::new("name", FieldType::STRING, Versions::ALL),
//!         Field::new("throttle_time_ms", FieldType::INT32, Versions::since(1)),
//!         Field::new("cluster_id", FieldType::STRING, Versions::since(2))
//!             .nullable(Versions::since(2))
//!             .tagged(0)
//!             .with_default(DefaultValue::Null),
//!     ],
//! );
//!
//! let record = Record::new(&DESCRIBE).with("name", "a")?;
//!
//! // Version 0 carries the name only.
//! assert_eq!(record.encode(0)?, &[0x00, 0x01, b'a'][..]);
//!
//! // Version 2 is flexible: compact name, throttle, and an empty tagged section.
//! assert_eq!(record.encode(2)?, &[0x02, b'a', 0, 0, 0, 0, 0x00][..]);
//!
//! // A tagged field is only written once it differs from its default.
//! let record = record.with("cluster_id", "c")?;
//! assert_eq!(record.encode(2)?, &[0x02, b'a', 0, 0, 0, 0, 0x01, 0x00, 0x02, 0x02, b'c'][..]);
//! # Ok::<(), kwire_codec::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod tagged;
pub mod types;
pub mod util;
pub mod value;
pub mod varint;

// Re-export main types and traits
pub use codec::{Context, Decode, Encode, EncodeSize, FixedSize, Read, Write};
pub use config::Limits;
pub use error::Error;
pub use record::Record;
pub use schema::{DefaultValue, Field, FieldType, Scalar, Schema, Version, Versions};
pub use tagged::RawTaggedField;
pub use types::Nullable;
pub use value::Value;
