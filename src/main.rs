use agent_provision::cli::Cli;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let agent_id = agent_provision::run(&cli, &mut out).await?;

    if let Some(agent_id) = agent_id {
        info!(agent_id = %agent_id, "Done");
    }

    Ok(())
}
