//! Cluster administration: AlterConfigs and DeleteTopics.

use kwire_codec::{DefaultValue, Field, FieldType, Scalar, Schema, Versions};

pub static ALTERABLE_CONFIG: Schema = Schema::nested(
    "AlterableConfig",
    &[
        Field::new("name", FieldType::STRING, Versions::ALL),
        Field::new("value", FieldType::STRING, Versions::ALL)
            .nullable(Versions::ALL)
            .with_default(DefaultValue::Null),
    ],
);

pub static ALTER_CONFIGS_RESOURCE: Schema = Schema::nested(
    "AlterConfigsResource",
    &[
        Field::new("resource_type", FieldType::INT8, Versions::ALL),
        Field::new("resource_name", FieldType::STRING, Versions::ALL),
        Field::new(
            "configs",
            FieldType::StructArray(&ALTERABLE_CONFIG),
            Versions::ALL,
        ),
    ],
);

pub static ALTER_CONFIGS_REQUEST: Schema = Schema::new(
    "AlterConfigsRequest",
    Versions::between(0, 2),
    Versions::since(2),
    &[
        Field::new(
            "resources",
            FieldType::StructArray(&ALTER_CONFIGS_RESOURCE),
            Versions::ALL,
        ),
        Field::new("validate_only", FieldType::BOOL, Versions::ALL),
    ],
);

pub static ALTER_CONFIGS_RESOURCE_RESPONSE: Schema = Schema::nested(
    "AlterConfigsResourceResponse",
    &[
        Field::new("error_code", FieldType::INT16, Versions::ALL),
        Field::new("error_message", FieldType::STRING, Versions::ALL)
            .nullable(Versions::ALL)
            .with_default(DefaultValue::Null),
        Field::new("resource_type", FieldType::INT8, Versions::ALL),
        Field::new("resource_name", FieldType::STRING, Versions::ALL),
    ],
);

pub static ALTER_CONFIGS_RESPONSE: Schema = Schema::new(
    "AlterConfigsResponse",
    Versions::between(0, 2),
    Versions::since(2),
    &[
        Field::new("throttle_time_ms", FieldType::INT32, Versions::ALL),
        Field::new(
            "responses",
            FieldType::StructArray(&ALTER_CONFIGS_RESOURCE_RESPONSE),
            Versions::ALL,
        ),
    ],
);

pub static DELETE_TOPIC_STATE: Schema = Schema::nested(
    "DeleteTopicState",
    &[
        Field::new("name", FieldType::STRING, Versions::ALL)
            .nullable(Versions::ALL)
            .with_default(DefaultValue::Null),
        Field::new("topic_id", FieldType::UUID, Versions::ALL),
    ],
);

pub static DELETE_TOPICS_REQUEST: Schema = Schema::new(
    "DeleteTopicsRequest",
    Versions::between(0, 6),
    Versions::since(4),
    &[
        Field::new(
            "topics",
            FieldType::StructArray(&DELETE_TOPIC_STATE),
            Versions::since(6),
        ),
        Field::new(
            "topic_names",
            FieldType::Array(Scalar::String),
            Versions::between(0, 5),
        ),
        Field::new("timeout_ms", FieldType::INT32, Versions::ALL),
    ],
);

pub static DELETABLE_TOPIC_RESULT: Schema = Schema::nested(
    "DeletableTopicResult",
    &[
        Field::new("name", FieldType::STRING, Versions::ALL).nullable(Versions::since(6)),
        Field::new("topic_id", FieldType::UUID, Versions::since(6)),
        Field::new("error_code", FieldType::INT16, Versions::ALL),
        Field::new("error_message", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
    ],
);

pub static DELETE_TOPICS_RESPONSE: Schema = Schema::new(
    "DeleteTopicsResponse",
    Versions::between(0, 6),
    Versions::since(4),
    &[
        Field::new("throttle_time_ms", FieldType::INT32, Versions::since(1)),
        Field::new(
            "responses",
            FieldType::StructArray(&DELETABLE_TOPIC_RESULT),
            Versions::ALL,
        ),
    ],
);
