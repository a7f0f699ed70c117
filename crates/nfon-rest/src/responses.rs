//! NFON API response types.

use serde::Deserialize;
use serde_json::Value;

/// One `{"name": ..., "value": ...}` entry of a resource's `data` array.
#[derive(Debug, Clone, Deserialize)]
pub struct DataField {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

/// Response of `GET /api/version`.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    pub href: Option<String>,
    pub data: Vec<DataField>,
}

impl VersionResponse {
    /// The version reported by the server: the value of the first data entry.
    pub fn version(&self) -> Option<String> {
        match &self.data.first()?.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Outcome of the endpoint-definition self-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    /// Version reported by the server.
    pub server_version: String,
    /// Version of the local endpoint table.
    pub local_version: String,
}

impl VersionCheck {
    /// True when the local endpoint definitions match the server.
    pub fn is_up_to_date(&self) -> bool {
        self.server_version == self.local_version
    }
}
