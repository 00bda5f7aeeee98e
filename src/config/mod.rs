use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

pub mod validator;

use crate::agents::domain::AgentConfigurationRequest;
use crate::agents::presets;
use crate::cli::Cli;

/// Default REST endpoint of the voice-agent platform
pub const DEFAULT_BASE_URL: &str = "https://backend.omnidim.io/api/v1";
/// Environment variable consulted last for the bearer credential
pub const DEFAULT_API_KEY_ENV: &str = "OMNIDIM_API_KEY";
/// Prefix for environment overrides, e.g. `AGENT_PROVISION__PLATFORM__TIMEOUT_SECONDS`
pub const ENV_PREFIX: &str = "AGENT_PROVISION";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub platform: PlatformSettings,
    /// Agent definition; prompt text may contain Tera placeholders
    #[serde(default)]
    pub agent: Option<AgentConfigurationRequest>,
    /// Values substituted into agent prompt templates
    #[serde(default = "default_variables")]
    pub variables: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform: PlatformSettings::default(),
            agent: None,
            variables: default_variables(),
        }
    }
}

fn default_variables() -> BTreeMap<String, String> {
    let mut variables = BTreeMap::new();
    variables.insert(
        presets::BACKEND_URL_VAR.to_string(),
        presets::DEFAULT_BACKEND_URL.to_string(),
    );
    variables
}

/// Connection settings for the voice-agent platform
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for each HTTP request
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Page size used when listing agents
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Bearer credential, plain or AGE-encrypted (prefixed with "age:")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            page_size: default_page_size(),
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

impl Settings {
    /// Load settings from a file (optional) plus environment overrides
    pub fn load(config_path: &Path) -> Result<Self, anyhow::Error> {
        let settings = Self::read_sources(config_path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Create settings from CLI arguments (config file, env, then CLI overrides)
    ///
    /// Validation runs once, on the merged result, so a flag can repair a bad
    /// file value.
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::read_sources(&cli.config)?;
        settings.apply_cli_overrides(cli);
        settings.validate()?;
        Ok(settings)
    }

    fn read_sources(config_path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        // A partial [variables] table should not drop the built-in ones
        for (key, value) in default_variables() {
            settings.variables.entry(key).or_insert(value);
        }
        Ok(settings)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.platform.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.timeout_seconds {
            self.platform.timeout_seconds = timeout;
        }
        for var in &cli.vars {
            if let Some((key, value)) = var.split_once('=') {
                self.variables.insert(key.trim().to_string(), value.to_string());
            } else {
                tracing::warn!("Ignoring template variable without '=': {}", var);
            }
        }
    }

    /// Pick the agent definition: explicit file, then `[agent]`, then the
    /// built-in SmartBuddy preset. The result is not yet rendered.
    pub fn agent_definition(
        &self,
        agent_file: Option<&Path>,
    ) -> Result<AgentConfigurationRequest, anyhow::Error> {
        if let Some(path) = agent_file {
            tracing::debug!(path = %path.display(), "Loading agent definition from file");
            return load_agent_file(path);
        }
        if let Some(agent) = &self.agent {
            return Ok(agent.clone());
        }
        tracing::debug!("No agent configured, using the SmartBuddy preset");
        Ok(presets::smart_buddy())
    }
}

/// Parse an agent definition from JSON, YAML or TOML based on the extension
pub fn load_agent_file(path: &Path) -> Result<AgentConfigurationRequest, anyhow::Error> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    let agent: AgentConfigurationRequest = match ext.as_str() {
        "json" => serde_json::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        other => anyhow::bail!(
            "Unsupported agent file extension '{}' for {} (expected json, yaml, yml or toml)",
            other,
            path.display()
        ),
    };
    Ok(agent)
}
