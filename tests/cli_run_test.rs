mod common;

use std::sync::atomic::Ordering;

use agent_provision::adapters::secrets;
use agent_provision::agents::ProvisionError;
use agent_provision::cli::Cli;
use agent_provision::config::PlatformSettings;
use clap::Parser;
use common::mock_platform::{MockPlatform, VALID_KEY};
use secrecy::ExposeSecret;
use tempfile::TempDir;

fn cli(temp_dir: &TempDir, base_url: &str, key: &str, args: &[&str]) -> Cli {
    let config = temp_dir.path().join("agent-provision.toml");
    let mut argv = vec![
        "agent-provision".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--base-url".to_string(),
        base_url.to_string(),
        "--api-key".to_string(),
        key.to_string(),
    ];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    Cli::parse_from(argv)
}

#[tokio::test]
async fn test_default_command_creates_smart_buddy() {
    let server = MockPlatform::start().await;
    let temp_dir = TempDir::new().unwrap();

    let mut out = Vec::new();
    let agent_id = agent_provision::run(&cli(&temp_dir, &server.base_url, VALID_KEY, &[]), &mut out)
        .await
        .unwrap()
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Status: 200");
    assert!(lines[1].starts_with("Created Agent: "));
    assert!(lines[1].contains(&agent_id));

    let payload = server.state.last_payload().unwrap();
    let body = payload["context_breakdown"][1]["body"].as_str().unwrap();
    assert!(body.contains("http://localhost:5003/add-transaction"));
}

#[tokio::test]
async fn test_second_run_finds_existing_agent() {
    let server = MockPlatform::start().await;
    let temp_dir = TempDir::new().unwrap();
    let args = cli(&temp_dir, &server.base_url, VALID_KEY, &["create"]);

    let first = agent_provision::run(&args, &mut Vec::new()).await.unwrap();
    let mut out = Vec::new();
    let second = agent_provision::run(&args, &mut out).await.unwrap();

    assert_eq!(first, second);
    assert!(String::from_utf8(out).unwrap().starts_with("Status: existing\n"));
    assert_eq!(server.state.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_allow_duplicate_creates_again() {
    let server = MockPlatform::start().await;
    server.seed_agent("SmartBuddy");
    let temp_dir = TempDir::new().unwrap();
    let args = cli(
        &temp_dir,
        &server.base_url,
        VALID_KEY,
        &["create", "--allow-duplicate"],
    );

    agent_provision::run(&args, &mut Vec::new()).await.unwrap();

    assert_eq!(server.state.agent_count(), 2);
    assert_eq!(server.state.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_api_key_is_authentication_error() {
    let server = MockPlatform::start().await;
    let temp_dir = TempDir::new().unwrap();
    let args = cli(&temp_dir, &server.base_url, "", &["create", "--allow-duplicate"]);

    let mut out = Vec::new();
    let err = agent_provision::run(&args, &mut out).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Authentication(_))
    ));
    assert!(out.is_empty());
    assert_eq!(server.state.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_render_uses_variables_without_network() {
    let temp_dir = TempDir::new().unwrap();
    // Nothing listens on port 9; render must not connect
    let args = cli(
        &temp_dir,
        "http://127.0.0.1:9/api/v1",
        VALID_KEY,
        &["--var", "backend_url=https://pocket.example.com", "render"],
    );

    let mut out = Vec::new();
    let result = agent_provision::run(&args, &mut out).await.unwrap();
    assert!(result.is_none());

    let rendered: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(rendered["name"], "SmartBuddy");
    let body = rendered["context_breakdown"][1]["body"].as_str().unwrap();
    assert!(body.contains("https://pocket.example.com/add-transaction"));
}

#[tokio::test]
async fn test_agent_file_overrides_preset() {
    let server = MockPlatform::start().await;
    let temp_dir = TempDir::new().unwrap();
    let agent_path = temp_dir.path().join("pocketpal.yaml");
    std::fs::write(
        &agent_path,
        r#"
name: PocketPal
welcome_message: Hello from PocketPal
context_breakdown:
  - title: Intro
    body: Log spending at {{ backend_url }}/add-transaction
transcriber:
  provider: deepgram_stream
model:
  model: gpt-4o-mini
voice:
  provider: eleven_labs
  voice_id: v3
"#,
    )
    .unwrap();

    let args = cli(
        &temp_dir,
        &server.base_url,
        VALID_KEY,
        &["create", "--agent", agent_path.to_str().unwrap()],
    );
    agent_provision::run(&args, &mut Vec::new()).await.unwrap();

    let payload = server.state.last_payload().unwrap();
    assert_eq!(payload["name"], "PocketPal");
    assert_eq!(
        payload["context_breakdown"][0]["body"],
        "Log spending at http://localhost:5003/add-transaction"
    );
}

#[tokio::test]
async fn test_list_and_get_commands() {
    let server = MockPlatform::start().await;
    let id = server.seed_agent("Ledger");
    let temp_dir = TempDir::new().unwrap();

    let mut out = Vec::new();
    agent_provision::run(&cli(&temp_dir, &server.base_url, VALID_KEY, &["list"]), &mut out)
        .await
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), format!("{}\tLedger\n", id));

    let mut out = Vec::new();
    let found = agent_provision::run(
        &cli(&temp_dir, &server.base_url, VALID_KEY, &["get", &id]),
        &mut out,
    )
    .await
    .unwrap();
    assert_eq!(found, Some(id));
    let resource: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(resource["name"], "Ledger");
}

#[tokio::test]
async fn test_encrypt_secret_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let args = cli(
        &temp_dir,
        "http://127.0.0.1:9/api/v1",
        VALID_KEY,
        &["--secret-passphrase", "hunter2", "encrypt-secret", "sk-live-abc"],
    );

    let mut out = Vec::new();
    agent_provision::run(&args, &mut out).await.unwrap();
    let sealed = String::from_utf8(out).unwrap();
    let sealed = sealed.trim_end();

    assert!(sealed.starts_with("age:"));
    let platform = PlatformSettings {
        api_key: Some(sealed.to_string()),
        ..Default::default()
    };
    let revealed =
        secrets::resolve_credential_with(None, &platform, Some("hunter2"), |_| None).unwrap();
    assert_eq!(revealed.expose_secret(), "sk-live-abc");
}

#[tokio::test]
async fn test_sealed_key_in_settings_file() {
    let server = MockPlatform::start().await;
    let temp_dir = TempDir::new().unwrap();
    let sealed = secrets::seal_credential(VALID_KEY, "hunter2").unwrap();
    std::fs::write(
        temp_dir.path().join("agent-provision.toml"),
        format!("[platform]\napi_key = \"{}\"\n", sealed),
    )
    .unwrap();

    let config = temp_dir.path().join("agent-provision.toml");
    let args = Cli::parse_from([
        "agent-provision",
        "--config",
        config.to_str().unwrap(),
        "--base-url",
        &server.base_url,
        "--secret-passphrase",
        "hunter2",
        "list",
    ]);

    // No --api-key here; an OMNIDIM_API_KEY in the environment would win
    if std::env::var("OMNIDIM_API_KEY").is_ok() {
        return;
    }
    agent_provision::run(&args, &mut Vec::new()).await.unwrap();
    assert_eq!(server.state.list_calls.load(Ordering::SeqCst), 1);
}
