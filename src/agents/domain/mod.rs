//! Domain types for agent provisioning
//!
//! The request/response model exchanged with the voice-agent platform and the
//! port trait the provisioner talks through.

mod builder;
mod request;
mod response;

pub use builder::*;
pub use request::*;
pub use response::*;

use async_trait::async_trait;

use crate::agents::error::ProvisionResult;

/// Port trait for a hosted voice-agent platform
///
/// Implementations perform exactly one HTTP request per call and never retry.
#[async_trait]
pub trait AgentPlatform: Send + Sync {
    /// Platform identifier used in logs
    fn name(&self) -> &str;

    /// Create a new agent. Not idempotent: every call creates a new resource.
    async fn create_agent(
        &self,
        request: &AgentConfigurationRequest,
    ) -> ProvisionResult<AgentCreationResponse>;

    /// List agents visible to the credential
    async fn list_agents(&self) -> ProvisionResult<Vec<AgentSummary>>;

    /// Fetch one agent by id
    async fn get_agent(&self, id: &str) -> ProvisionResult<AgentResource>;
}
