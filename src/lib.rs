//! # agent-provision
//!
//! Provisions conversational voice agents on a hosted voice-agent platform.
//! An agent is a bundle of prompts (context entries), speech-to-text,
//! LLM and voice settings, and post-call email actions; this crate builds
//! that bundle, validates it locally and submits it in a single create call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_provision::agents::{platform, presets, ProvisioningInvoker};
//! use agent_provision::config::PlatformSettings;
//! use secrecy::SecretString;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let credential = SecretString::from(std::env::var("OMNIDIM_API_KEY")?);
//!     let platform = platform::create_platform(&PlatformSettings::default(), credential)?;
//!     let submitted = ProvisioningInvoker::new(platform, presets::smart_buddy_rendered())?
//!         .submit()
//!         .await?;
//!     println!("{}", submitted.agent_id());
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - **agents**: domain types, platform client, invoker, templates, presets
//! - **adapters**: sealed secrets and credential resolution
//! - **config**: settings loading and validation
//! - **cli**: command-line arguments

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;

use std::io::Write;
use std::sync::Arc;

use crate::adapters::secrets;
use crate::agents::{platform, template, AgentPlatform, ProvisionError, ProvisioningInvoker};
use crate::cli::{Cli, Command};
use crate::config::validator::AgentValidator;
use crate::config::Settings;

/// Run one CLI command, writing user-facing output to `out`
///
/// Returns the id of the agent that was created or found, for commands that
/// produce one.
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<Option<String>> {
    // encrypt-secret runs without settings
    let settings = || Settings::new_with_cli(cli);

    match cli.command() {
        Command::EncryptSecret { value } => {
            let passphrase = cli.secret_passphrase.as_deref().ok_or_else(|| {
                anyhow::anyhow!(
                    "A passphrase is required: pass --secret-passphrase or set AGENT_PROVISION_SECRET_PASSPHRASE"
                )
            })?;
            writeln!(out, "{}", secrets::seal_credential(&value, passphrase)?)?;
            Ok(None)
        }
        Command::Render { agent } => {
            let settings = settings()?;
            let definition = settings.agent_definition(agent.as_deref())?;
            let request = template::render_request(&definition, &settings.variables)?;
            AgentValidator::validate(&request)
                .map_err(|errors| ProvisionError::from_validation(&errors))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&request)?)?;
            Ok(None)
        }
        Command::Create {
            agent,
            allow_duplicate,
        } => {
            let settings = settings()?;
            let definition = settings.agent_definition(agent.as_deref())?;
            let request = template::render_request(&definition, &settings.variables)?;
            let invoker = ProvisioningInvoker::new(connect(cli, &settings)?, request)?;

            let submitted = if allow_duplicate {
                invoker.submit().await?
            } else {
                invoker.submit_if_absent().await?
            };

            submitted.write_report(out)?;
            Ok(Some(submitted.agent_id().to_string()))
        }
        Command::List => {
            let platform = connect(cli, &settings()?)?;
            for agent in platform.list_agents().await? {
                writeln!(out, "{}\t{}", agent.id, agent.name.as_deref().unwrap_or(""))?;
            }
            Ok(None)
        }
        Command::Get { id } => {
            let platform = connect(cli, &settings()?)?;
            let resource = platform.get_agent(&id).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&resource)?)?;
            Ok(Some(resource.id))
        }
    }
}

/// Resolve the credential and build the platform client
fn connect(cli: &Cli, settings: &Settings) -> anyhow::Result<Arc<dyn AgentPlatform>> {
    let credential = secrets::resolve_credential(
        cli.api_key.as_deref(),
        &settings.platform,
        cli.secret_passphrase.as_deref(),
    )?;
    Ok(platform::create_platform(&settings.platform, credential)?)
}
