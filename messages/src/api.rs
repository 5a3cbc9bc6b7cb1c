//! API keys and the per-key version and header tables.

use crate::{admin, api_versions, group};
use kwire_codec::{Error, Schema, Version, Versions};
use std::fmt;

/// Identifies the operation a request performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i16)]
pub enum ApiKey {
    FindCoordinator = 10,
    JoinGroup = 11,
    Heartbeat = 12,
    LeaveGroup = 13,
    SyncGroup = 14,
    ApiVersions = 18,
    DeleteTopics = 20,
    AlterConfigs = 33,
}

impl ApiKey {
    /// Every supported key, in id order.
    pub const ALL: [Self; 8] = [
        Self::FindCoordinator,
        Self::JoinGroup,
        Self::Heartbeat,
        Self::LeaveGroup,
        Self::SyncGroup,
        Self::ApiVersions,
        Self::DeleteTopics,
        Self::AlterConfigs,
    ];

    /// The id carried in the request header.
    pub const fn id(self) -> i16 {
        self as i16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::FindCoordinator => "FindCoordinator",
            Self::JoinGroup => "JoinGroup",
            Self::Heartbeat => "Heartbeat",
            Self::LeaveGroup => "LeaveGroup",
            Self::SyncGroup => "SyncGroup",
            Self::ApiVersions => "ApiVersions",
            Self::DeleteTopics => "DeleteTopics",
            Self::AlterConfigs => "AlterConfigs",
        }
    }

    pub fn request_schema(self) -> &'static Schema {
        match self {
            Self::FindCoordinator => &group::FIND_COORDINATOR_REQUEST,
            Self::JoinGroup => &group::JOIN_GROUP_REQUEST,
            Self::Heartbeat => &group::HEARTBEAT_REQUEST,
            Self::LeaveGroup => &group::LEAVE_GROUP_REQUEST,
            Self::SyncGroup => &group::SYNC_GROUP_REQUEST,
            Self::ApiVersions => &api_versions::API_VERSIONS_REQUEST,
            Self::DeleteTopics => &admin::DELETE_TOPICS_REQUEST,
            Self::AlterConfigs => &admin::ALTER_CONFIGS_REQUEST,
        }
    }

    pub fn response_schema(self) -> &'static Schema {
        match self {
            Self::FindCoordinator => &group::FIND_COORDINATOR_RESPONSE,
            Self::JoinGroup => &group::JOIN_GROUP_RESPONSE,
            Self::Heartbeat => &group::HEARTBEAT_RESPONSE,
            Self::LeaveGroup => &group::LEAVE_GROUP_RESPONSE,
            Self::SyncGroup => &group::SYNC_GROUP_RESPONSE,
            Self::ApiVersions => &api_versions::API_VERSIONS_RESPONSE,
            Self::DeleteTopics => &admin::DELETE_TOPICS_RESPONSE,
            Self::AlterConfigs => &admin::ALTER_CONFIGS_RESPONSE,
        }
    }

    /// The versions of this API that can be encoded and decoded.
    pub fn versions(self) -> Versions {
        self.request_schema().versions()
    }

    /// Returns true if `version` uses the flexible encoding.
    pub fn is_flexible(self, version: Version) -> bool {
        self.request_schema().is_flexible(version)
    }

    /// The request header version to frame a request of `version` with.
    pub fn request_header_version(self, version: Version) -> Version {
        if self.is_flexible(version) {
            2
        } else {
            1
        }
    }

    /// The response header version to frame a response of `version` with.
    ///
    /// ApiVersions responses always use version 0, so that a client can parse the reply even
    /// when the broker does not support the version it asked for.
    pub fn response_header_version(self, version: Version) -> Version {
        match self {
            Self::ApiVersions => 0,
            _ if self.is_flexible(version) => 1,
            _ => 0,
        }
    }
}

impl TryFrom<i16> for ApiKey {
    type Error = Error;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|key| key.id() == id)
            .ok_or_else(|| Error::InvalidData("ApiKey", format!("unsupported api key {id}")))
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
