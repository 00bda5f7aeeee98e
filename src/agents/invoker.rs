//! Agent provisioning invoker
//!
//! A [`ProvisioningInvoker`] holds a validated request that has not been sent.
//! Submitting consumes it and yields a [`Submitted`] record, so a request can
//! reach the platform at most once per invoker.

use std::io::Write;
use std::sync::Arc;

use super::domain::{AgentConfigurationRequest, AgentCreationResponse, AgentPlatform, AgentResource};
use super::error::{ProvisionError, ProvisionResult};
use crate::config::validator::AgentValidator;

/// Unsubmitted state: a validated request bound to a platform
pub struct ProvisioningInvoker {
    platform: Arc<dyn AgentPlatform>,
    request: AgentConfigurationRequest,
}

impl std::fmt::Debug for ProvisioningInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningInvoker")
            .field("platform", &self.platform.name())
            .field("agent", &self.request.name)
            .finish_non_exhaustive()
    }
}

/// What the submission did on the platform
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A new agent was created
    Created(AgentCreationResponse),
    /// An agent with the same name already existed; nothing was created
    Existing(AgentResource),
}

/// Submitted state
#[derive(Debug, Clone)]
pub struct Submitted {
    outcome: Outcome,
}

impl ProvisioningInvoker {
    /// Bind a request to a platform, validating it first
    pub fn new(
        platform: Arc<dyn AgentPlatform>,
        request: AgentConfigurationRequest,
    ) -> ProvisionResult<Self> {
        let request = request.normalize();
        AgentValidator::validate(&request)
            .map_err(|errors| ProvisionError::from_validation(&errors))?;
        Ok(Self { platform, request })
    }

    pub fn request(&self) -> &AgentConfigurationRequest {
        &self.request
    }

    /// Issue exactly one create call
    pub async fn submit(self) -> ProvisionResult<Submitted> {
        tracing::debug!(
            platform = self.platform.name(),
            agent = %self.request.name,
            context_entries = self.request.context_breakdown.len(),
            "Submitting agent"
        );
        let response = self.platform.create_agent(&self.request).await?;
        Ok(Submitted {
            outcome: Outcome::Created(response),
        })
    }

    /// Create the agent only if none with the same name exists
    pub async fn submit_if_absent(self) -> ProvisionResult<Submitted> {
        let existing = self
            .platform
            .list_agents()
            .await?
            .into_iter()
            .find(|agent| agent.name.as_deref() == Some(self.request.name.as_str()));

        match existing {
            Some(summary) => {
                tracing::info!(
                    agent = %self.request.name,
                    agent_id = %summary.id,
                    "Agent already exists, skipping creation"
                );
                let resource = self.platform.get_agent(&summary.id).await?;
                Ok(Submitted {
                    outcome: Outcome::Existing(resource),
                })
            }
            None => self.submit().await,
        }
    }
}

impl Submitted {
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn agent_id(&self) -> &str {
        match &self.outcome {
            Outcome::Created(response) => response.agent_id(),
            Outcome::Existing(resource) => &resource.id,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self.outcome, Outcome::Created(_))
    }

    /// Write the two result lines: status, then the agent description
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match &self.outcome {
            Outcome::Created(response) => {
                writeln!(out, "Status: {}", response.status)?;
                writeln!(out, "Created Agent: {}", to_json(&response.json))?;
            }
            Outcome::Existing(resource) => {
                writeln!(out, "Status: existing")?;
                writeln!(out, "Existing Agent: {}", to_json(resource))?;
            }
        }
        Ok(())
    }
}

fn to_json(resource: &AgentResource) -> String {
    serde_json::to_string(resource).unwrap_or_else(|_| format!("{:?}", resource))
}
