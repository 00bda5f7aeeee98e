//! Voice agent provisioning
//!
//! ## Architecture
//!
//! - `domain/` - Request/response types and the `AgentPlatform` port
//! - `platform/` - REST client for the hosted voice-agent platform
//! - `invoker` - Validated, submit-once provisioning
//! - `template` - Tera rendering of prompt text
//! - `presets` - Built-in agent definitions

pub mod domain;
pub mod error;
pub mod invoker;
pub mod platform;
pub mod presets;
pub mod template;

// Re-export commonly used types
pub use domain::*;
pub use error::*;
pub use invoker::{Outcome, ProvisioningInvoker, Submitted};
