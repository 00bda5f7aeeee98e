//! Voice-agent platform clients
//!
//! - OmniDimension-compatible REST API (`/agents`, `/agents/create`)

mod omnidim;

pub use omnidim::OmniDimClient;

use std::sync::Arc;

use secrecy::SecretString;

use crate::agents::domain::AgentPlatform;
use crate::agents::error::ProvisionResult;
use crate::config::PlatformSettings;

/// Create the platform client for the configured endpoint
pub fn create_platform(
    settings: &PlatformSettings,
    credential: SecretString,
) -> ProvisionResult<Arc<dyn AgentPlatform>> {
    let client = OmniDimClient::new(settings, credential)?;
    Ok(Arc::new(client))
}
