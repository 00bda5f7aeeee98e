//! Responses returned by the agent platform

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Result of a successful create call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCreationResponse {
    /// HTTP status reported by the platform
    pub status: u16,
    /// Description of the created agent
    pub json: AgentResource,
}

impl AgentCreationResponse {
    pub fn agent_id(&self) -> &str {
        &self.json.id
    }
}

/// An agent as described by the platform
///
/// Only `id` and `name` are interpreted; every other field is preserved so the
/// full description can be printed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResource {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Compact listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    /// Agents created without a name list as `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&AgentResource> for AgentSummary {
    fn from(resource: &AgentResource) -> Self {
        Self {
            id: resource.id.clone(),
            name: resource.name.clone(),
        }
    }
}

/// The platform hands out numeric ids; keep them as opaque strings.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for id, got {}",
            other
        ))),
    }
}
