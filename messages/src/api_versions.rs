//! ApiVersions: discovers which versions of each API a broker supports.

use kwire_codec::{DefaultValue, Field, FieldType, Schema, Versions};

pub static API_VERSIONS_REQUEST: Schema = Schema::new(
    "ApiVersionsRequest",
    Versions::between(0, 3),
    Versions::since(3),
    &[
        Field::new("client_software_name", FieldType::STRING, Versions::since(3)),
        Field::new("client_software_version", FieldType::STRING, Versions::since(3)),
    ],
);

pub static API_VERSION: Schema = Schema::nested(
    "ApiVersion",
    &[
        Field::new("api_key", FieldType::INT16, Versions::ALL),
        Field::new("min_version", FieldType::INT16, Versions::ALL),
        Field::new("max_version", FieldType::INT16, Versions::ALL),
    ],
);

pub static SUPPORTED_FEATURE: Schema = Schema::nested(
    "SupportedFeatureKey",
    &[
        Field::new("name", FieldType::STRING, Versions::ALL),
        Field::new("min_version", FieldType::INT16, Versions::ALL),
        Field::new("max_version", FieldType::INT16, Versions::ALL),
    ],
);

pub static FINALIZED_FEATURE: Schema = Schema::nested(
    "FinalizedFeatureKey",
    &[
        Field::new("name", FieldType::STRING, Versions::ALL),
        Field::new("max_version_level", FieldType::INT16, Versions::ALL),
        Field::new("min_version_level", FieldType::INT16, Versions::ALL),
    ],
);

pub static API_VERSIONS_RESPONSE: Schema = Schema::new(
    "ApiVersionsResponse",
    Versions::between(0, 3),
    Versions::since(3),
    &[
        Field::new("error_code", FieldType::INT16, Versions::ALL),
        Field::new("api_keys", FieldType::StructArray(&API_VERSION), Versions::ALL),
        Field::new("throttle_time_ms", FieldType::INT32, Versions::since(1)),
        Field::new(
            "supported_features",
            FieldType::StructArray(&SUPPORTED_FEATURE),
            Versions::since(3),
        )
        .tagged(0),
        Field::new("finalized_features_epoch", FieldType::INT64, Versions::since(3))
            .tagged(1)
            .with_default(DefaultValue::Int(-1)),
        Field::new(
            "finalized_features",
            FieldType::StructArray(&FINALIZED_FEATURE),
            Versions::since(3),
        )
        .tagged(2),
        Field::new("zk_migration_ready", FieldType::BOOL, Versions::since(3)).tagged(3),
    ],
);
