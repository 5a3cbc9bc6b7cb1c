//! Request and response headers.
//!
//! Headers are versioned independently of the message they frame. The header version is
//! derived from the message: see [`ApiKey::request_header_version`] and
//! [`ApiKey::response_header_version`].
//!
//! [`ApiKey::request_header_version`]: crate::ApiKey::request_header_version
//! [`ApiKey::response_header_version`]: crate::ApiKey::response_header_version

use kwire_codec::{DefaultValue, Field, FieldType, Schema, Versions};

pub static REQUEST_HEADER: Schema = Schema::new(
    "RequestHeader",
    Versions::between(0, 2),
    Versions::since(2),
    &[
        Field::new("request_api_key", FieldType::INT16, Versions::ALL),
        Field::new("request_api_version", FieldType::INT16, Versions::ALL),
        Field::new("correlation_id", FieldType::INT32, Versions::ALL),
        // Stays a legacy string in v2 so that brokers can read it before knowing the version.
        Field::new("client_id", FieldType::STRING, Versions::since(1))
            .nullable(Versions::since(1))
            .flexible_versions(Versions::NONE)
            .with_default(DefaultValue::Null),
    ],
);

pub static RESPONSE_HEADER: Schema = Schema::new(
    "ResponseHeader",
    Versions::between(0, 1),
    Versions::since(1),
    &[Field::new("correlation_id", FieldType::INT32, Versions::ALL)],
);
