//! Consumer group coordination: FindCoordinator, JoinGroup, SyncGroup, Heartbeat, and
//! LeaveGroup.

use kwire_codec::{DefaultValue, Field, FieldType, Scalar, Schema, Versions};

pub static FIND_COORDINATOR_REQUEST: Schema = Schema::new(
    "FindCoordinatorRequest",
    Versions::between(0, 4),
    Versions::since(3),
    &[
        Field::new("key", FieldType::STRING, Versions::between(0, 3)),
        Field::new("key_type", FieldType::INT8, Versions::since(1)),
        Field::new(
            "coordinator_keys",
            FieldType::Array(Scalar::String),
            Versions::since(4),
        ),
    ],
);

pub static COORDINATOR: Schema = Schema::nested(
    "Coordinator",
    &[
        Field::new("key", FieldType::STRING, Versions::ALL),
        Field::new("node_id", FieldType::INT32, Versions::ALL),
        Field::new("host", FieldType::STRING, Versions::ALL),
        Field::new("port", FieldType::INT32, Versions::ALL),
        Field::new("error_code", FieldType::INT16, Versions::ALL),
        Field::new("error_message", FieldType::STRING, Versions::ALL)
            .nullable(Versions::ALL)
            .with_default(DefaultValue::Null),
    ],
);

pub static FIND_COORDINATOR_RESPONSE: Schema = Schema::new(
    "FindCoordinatorResponse",
    Versions::between(0, 4),
    Versions::since(3),
    &[
        Field::new("throttle_time_ms", FieldType::INT32, Versions::since(1)),
        Field::new("error_code", FieldType::INT16, Versions::between(0, 3)),
        Field::new("error_message", FieldType::STRING, Versions::between(1, 3))
            .nullable(Versions::between(1, 3))
            .with_default(DefaultValue::Null),
        Field::new("node_id", FieldType::INT32, Versions::between(0, 3)),
        Field::new("host", FieldType::STRING, Versions::between(0, 3)),
        Field::new("port", FieldType::INT32, Versions::between(0, 3)),
        Field::new(
            "coordinators",
            FieldType::StructArray(&COORDINATOR),
            Versions::since(4),
        ),
    ],
);

pub static JOIN_GROUP_PROTOCOL: Schema = Schema::nested(
    "JoinGroupRequestProtocol",
    &[
        Field::new("name", FieldType::STRING, Versions::ALL),
        Field::new("metadata", FieldType::BYTES, Versions::ALL),
    ],
);

pub static JOIN_GROUP_REQUEST: Schema = Schema::new(
    "JoinGroupRequest",
    Versions::between(0, 9),
    Versions::since(6),
    &[
        Field::new("group_id", FieldType::STRING, Versions::ALL),
        Field::new("session_timeout_ms", FieldType::INT32, Versions::ALL),
        Field::new("rebalance_timeout_ms", FieldType::INT32, Versions::since(1))
            .with_default(DefaultValue::Int(-1)),
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new("group_instance_id", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
        Field::new("protocol_type", FieldType::STRING, Versions::ALL),
        Field::new(
            "protocols",
            FieldType::StructArray(&JOIN_GROUP_PROTOCOL),
            Versions::ALL,
        ),
        Field::new("reason", FieldType::STRING, Versions::since(8))
            .nullable(Versions::since(8))
            .with_default(DefaultValue::Null),
    ],
);

pub static JOIN_GROUP_MEMBER: Schema = Schema::nested(
    "JoinGroupResponseMember",
    &[
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new("group_instance_id", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
        Field::new("metadata", FieldType::BYTES, Versions::ALL),
    ],
);

pub static JOIN_GROUP_RESPONSE: Schema = Schema::new(
    "JoinGroupResponse",
    Versions::between(0, 9),
    Versions::since(6),
    &[
        Field::new("throttle_time_ms", FieldType::INT32, Versions::since(2)),
        Field::new("error_code", FieldType::INT16, Versions::ALL),
        Field::new("generation_id", FieldType::INT32, Versions::ALL)
            .with_default(DefaultValue::Int(-1)),
        Field::new("protocol_type", FieldType::STRING, Versions::since(7))
            .nullable(Versions::since(7))
            .with_default(DefaultValue::Null),
        Field::new("protocol_name", FieldType::STRING, Versions::ALL)
            .nullable(Versions::since(7)),
        Field::new("leader", FieldType::STRING, Versions::ALL),
        Field::new("skip_assignment", FieldType::BOOL, Versions::since(9)),
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new(
            "members",
            FieldType::StructArray(&JOIN_GROUP_MEMBER),
            Versions::ALL,
        ),
    ],
);

pub static SYNC_GROUP_ASSIGNMENT: Schema = Schema::nested(
    "SyncGroupRequestAssignment",
    &[
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new("assignment", FieldType::BYTES, Versions::ALL),
    ],
);

pub static SYNC_GROUP_REQUEST: Schema = Schema::new(
    "SyncGroupRequest",
    Versions::between(0, 5),
    Versions::since(4),
    &[
        Field::new("group_id", FieldType::STRING, Versions::ALL),
        Field::new("generation_id", FieldType::INT32, Versions::ALL),
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new("group_instance_id", FieldType::STRING, Versions::since(3))
            .nullable(Versions::since(3))
            .with_default(DefaultValue::Null),
        Field::new("protocol_type", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
        Field::new("protocol_name", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
        Field::new(
            "assignments",
            FieldType::StructArray(&SYNC_GROUP_ASSIGNMENT),
            Versions::ALL,
        ),
    ],
);

pub static SYNC_GROUP_RESPONSE: Schema = Schema::new(
    "SyncGroupResponse",
    Versions::between(0, 5),
    Versions::since(4),
    &[
        Field::new("throttle_time_ms", FieldType::INT32, Versions::since(1)),
        Field::new("error_code", FieldType::INT16, Versions::ALL),
        Field::new("protocol_type", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
        Field::new("protocol_name", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
        Field::new("assignment", FieldType::BYTES, Versions::ALL),
    ],
);

pub static HEARTBEAT_REQUEST: Schema = Schema::new(
    "HeartbeatRequest",
    Versions::between(0, 4),
    Versions::since(4),
    &[
        Field::new("group_id", FieldType::STRING, Versions::ALL),
        Field::new("generation_id", FieldType::INT32, Versions::ALL),
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new("group_instance_id", FieldType::STRING, Versions::since(3))
            .nullable(Versions::since(3))
            .with_default(DefaultValue::Null),
    ],
);

pub static HEARTBEAT_RESPONSE: Schema = Schema::new(
    "HeartbeatResponse",
    Versions::between(0, 4),
    Versions::since(4),
    &[
        Field::new("throttle_time_ms", FieldType::INT32, Versions::since(1)),
        Field::new("error_code", FieldType::INT16, Versions::ALL),
    ],
);

pub static LEAVE_GROUP_MEMBER: Schema = Schema::nested(
    "MemberIdentity",
    &[
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new("group_instance_id", FieldType::STRING, Versions::ALL)
            .nullable(Versions::ALL)
            .with_default(DefaultValue::Null),
        Field::new("reason", FieldType::STRING, Versions::since(5))
            .nullable(Versions::since(5))
            .with_default(DefaultValue::Null),
    ],
);

pub static LEAVE_GROUP_REQUEST: Schema = Schema::new(
    "LeaveGroupRequest",
    Versions::between(0, 5),
    Versions::since(4),
    &[
        Field::new("group_id", FieldType::STRING, Versions::ALL),
        Field::new("member_id", FieldType::STRING, Versions::between(0, 2)),
        Field::new(
            "members",
            FieldType::StructArray(&LEAVE_GROUP_MEMBER),
            Versions::since(3),
        ),
    ],
);

pub static LEAVE_GROUP_MEMBER_RESPONSE: Schema = Schema::nested(
    "MemberResponse",
    &[
        Field::new("member_id", FieldType::STRING, Versions::ALL),
        Field::new("group_instance_id", FieldType::STRING, Versions::ALL)
            .nullable(Versions::ALL)
            .with_default(DefaultValue::Null),
        Field::new("error_code", FieldType::INT16, Versions::ALL),
    ],
);

pub static LEAVE_GROUP_RESPONSE: Schema = Schema::new(
    "LeaveGroupResponse",
    Versions::between(0, 5),
    Versions::since(4),
    &[
        Field::new("throttle_time_ms", FieldType::INT32, Versions::since(1)),
        Field::new("error_code", FieldType::INT16, Versions::ALL),
        Field::new(
            "members",
            FieldType::StructArray(&LEAVE_GROUP_MEMBER_RESPONSE),
            Versions::since(3),
        ),
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use kwire_codec::{Record, Value, Version};
    use test_case::test_case;

    fn join_group(version: Version) -> Record {
        let protocol = Record::new(&JOIN_GROUP_PROTOCOL)
            .with("name", "range")
            .unwrap()
            .with("metadata", Bytes::from_static(&[0, 1, 2]))
            .unwrap();
        let mut request = Record::new(&JOIN_GROUP_REQUEST)
            .with("group_id", "payments")
            .unwrap()
            .with("session_timeout_ms", 10_000i32)
            .unwrap()
            .with("member_id", "")
            .unwrap()
            .with("protocol_type", "consumer")
            .unwrap()
            .with("protocols", Value::array([protocol]))
            .unwrap();
        if version >= 1 {
            request.set("rebalance_timeout_ms", 30_000i32).unwrap();
        }
        if version >= 5 {
            request.set("group_instance_id", "instance-1").unwrap();
        }
        request
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(5)]
    #[test_case(6)]
    #[test_case(9)]
    fn test_join_group_round_trip(version: Version) {
        let request = join_group(version);
        let encoded = request.encode(version).unwrap();
        let decoded = Record::decode(&JOIN_GROUP_REQUEST, encoded, version).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_join_group_cutover() {
        let request = join_group(5);
        let v5 = request.encode(5).unwrap();
        let v6 = request.encode(6).unwrap();
        // group_id: int16 length at v5, varint length + 1 at v6.
        assert_eq!(&v5[..2], &[0x00, 0x08]);
        assert_eq!(v6[0], 0x09);
        // Seven length prefixes shrink, two empty tagged sections are added.
        assert_eq!(v6.len(), v5.len() - 18 + 7 + 2);
    }

    #[test]
    fn test_protocol_name_nullable_from_v7() {
        let response = Record::new(&JOIN_GROUP_RESPONSE)
            .with("protocol_name", Value::Null)
            .unwrap();
        assert!(response.encode(6).is_err());
        let encoded = response.encode(7).unwrap();
        let decoded = Record::decode(&JOIN_GROUP_RESPONSE, encoded, 7).unwrap();
        assert_eq!(decoded.get("protocol_name"), Some(&Value::Null));
    }

    #[test]
    fn test_find_coordinator_batched() {
        let coordinator = Record::new(&COORDINATOR)
            .with("key", "payments")
            .unwrap()
            .with("node_id", 1i32)
            .unwrap()
            .with("host", "broker-1")
            .unwrap()
            .with("port", 9092i32)
            .unwrap();
        let response = Record::new(&FIND_COORDINATOR_RESPONSE)
            .with("coordinators", Value::array([coordinator]))
            .unwrap();
        let encoded = response.encode(4).unwrap();
        assert_eq!(
            Record::decode(&FIND_COORDINATOR_RESPONSE, encoded, 4).unwrap(),
            response
        );

        // The single-coordinator fields are gone in v4.
        let legacy = Record::new(&FIND_COORDINATOR_RESPONSE)
            .with("host", "broker-1")
            .unwrap();
        assert_eq!(
            legacy.encode_size(4).unwrap(),
            Record::new(&FIND_COORDINATOR_RESPONSE).encode_size(4).unwrap()
        );
    }

    #[test]
    fn test_leave_group_members() {
        let member = Record::new(&LEAVE_GROUP_MEMBER)
            .with("member_id", "m-1")
            .unwrap()
            .with("reason", "shutdown")
            .unwrap();
        let request = Record::new(&LEAVE_GROUP_REQUEST)
            .with("group_id", "payments")
            .unwrap()
            .with("members", Value::array([member]))
            .unwrap();

        let encoded = request.encode(5).unwrap();
        assert_eq!(
            Record::decode(&LEAVE_GROUP_REQUEST, encoded, 5).unwrap(),
            request
        );

        // The nested reason follows the message version.
        let encoded = request.encode(3).unwrap();
        let decoded = Record::decode(&LEAVE_GROUP_REQUEST, encoded, 3).unwrap();
        let members = decoded.get("members").and_then(Value::as_array).unwrap();
        let member = members[0].as_record().unwrap();
        assert_eq!(member.get("reason"), Some(&Value::Null));
        assert_eq!(member.get("member_id"), Some(&Value::from("m-1")));
    }

    #[test]
    fn test_heartbeat_sizes() {
        let request = Record::new(&HEARTBEAT_REQUEST)
            .with("group_id", "g")
            .unwrap()
            .with("member_id", "m")
            .unwrap();
        // group_id + generation_id + member_id
        assert_eq!(request.encode_size(0).unwrap(), 3 + 4 + 3);
        // plus a null group_instance_id
        assert_eq!(request.encode_size(3).unwrap(), 3 + 4 + 3 + 2);
        // compact strings and a tagged section
        assert_eq!(request.encode_size(4).unwrap(), 2 + 4 + 2 + 1 + 1);
    }
}
