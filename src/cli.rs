use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Provision conversational voice agents on a hosted voice-agent platform
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-provision", version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings file (TOML, YAML or JSON; optional)
    #[arg(
        short,
        long,
        env = "AGENT_PROVISION_CONFIG",
        default_value = "agent-provision.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Platform REST base URL
    #[arg(long, env = "AGENT_PROVISION_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Platform API key
    #[arg(long, env = "OMNIDIM_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Passphrase for AGE-sealed values in the settings file
    #[arg(
        long,
        env = "AGENT_PROVISION_SECRET_PASSPHRASE",
        hide_env_values = true,
        global = true
    )]
    pub secret_passphrase: Option<String>,

    /// Template variable for agent prompts, e.g. backend_url=https://pocket.example.com
    #[arg(long = "var", value_name = "KEY=VALUE", global = true)]
    pub vars: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the agent (skipped if one with the same name exists)
    Create {
        /// Agent definition file (JSON, YAML or TOML)
        #[arg(long)]
        agent: Option<PathBuf>,

        /// Create even if an agent with the same name already exists
        #[arg(long)]
        allow_duplicate: bool,
    },
    /// Print the rendered, validated request without contacting the platform
    Render {
        /// Agent definition file (JSON, YAML or TOML)
        #[arg(long)]
        agent: Option<PathBuf>,
    },
    /// List agents on the platform
    List,
    /// Show one agent
    Get {
        /// Agent id
        id: String,
    },
    /// Seal a value for use as platform.api_key in the settings file
    EncryptSecret {
        /// Value to seal
        value: String,
    },
}

impl Cli {
    /// The command to run; plain `agent-provision` creates the agent
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Create {
            agent: None,
            allow_duplicate: false,
        })
    }
}
