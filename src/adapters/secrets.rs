//! Resolution of the platform bearer credential
//!
//! Sources, first match wins:
//! 1. explicit value (`--api-key` / `OMNIDIM_API_KEY` via the CLI)
//! 2. `platform.api_key` in the settings file, plain or sealed
//! 3. the environment variable named by `platform.api_key_env`
//!
//! A sealed key is `age:` followed by base64 of an AGE passphrase envelope,
//! as produced by `agent-provision encrypt-secret <key>`:
//! ```toml
//! [platform]
//! api_key = "age:YWdlLWVuY3J5cHRpb24ub3JnL3YxCi0+IHNjcnlwdC..."
//! ```

use std::io::{Read, Write};

use base64::Engine;
use secrecy::SecretString;

use crate::agents::error::{ProvisionError, ProvisionResult};
use crate::config::PlatformSettings;

const SEALED_PREFIX: &str = "age:";

/// Where the credential was found; logged, never the value itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    SettingsFile,
    SealedSettingsFile,
    Environment,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Explicit => write!(f, "explicit"),
            CredentialSource::SettingsFile => write!(f, "settings_file"),
            CredentialSource::SealedSettingsFile => write!(f, "sealed_settings_file"),
            CredentialSource::Environment => write!(f, "environment"),
        }
    }
}

/// Seal an API key for storage as `platform.api_key`
pub fn seal_credential(api_key: &str, passphrase: &str) -> ProvisionResult<String> {
    let encryptor = age::Encryptor::with_user_passphrase(age::secrecy::SecretString::from(
        passphrase.to_string(),
    ));

    let mut envelope = vec![];
    let mut writer = encryptor
        .wrap_output(&mut envelope)
        .map_err(|e| sealing_failed(e.to_string()))?;
    writer
        .write_all(api_key.as_bytes())
        .map_err(|e| sealing_failed(e.to_string()))?;
    writer.finish().map_err(|e| sealing_failed(e.to_string()))?;

    Ok(format!(
        "{}{}",
        SEALED_PREFIX,
        base64::engine::general_purpose::STANDARD.encode(&envelope)
    ))
}

fn sealing_failed(reason: String) -> ProvisionError {
    ProvisionError::Configuration(format!("Failed to seal API key: {}", reason))
}

/// Open a sealed `platform.api_key`
fn open_sealed(encoded: &str, passphrase: Option<&str>) -> ProvisionResult<SecretString> {
    let unreadable = |reason: &str| {
        ProvisionError::Configuration(format!("Failed to read sealed platform.api_key: {}", reason))
    };

    let passphrase = passphrase.ok_or_else(|| {
        unreadable("no passphrase given (--secret-passphrase or AGENT_PROVISION_SECRET_PASSPHRASE)")
    })?;
    let envelope = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| unreadable("not valid base64"))?;

    let decryptor = age::Decryptor::new(&envelope[..]).map_err(|e| unreadable(&e.to_string()))?;
    let decryptor = match decryptor {
        age::Decryptor::Passphrase(d) => d,
        _ => return Err(unreadable("not sealed with a passphrase")),
    };

    let mut api_key = String::new();
    decryptor
        .decrypt(&age::secrecy::SecretString::from(passphrase.to_string()), None)
        .map_err(|e| unreadable(&e.to_string()))?
        .read_to_string(&mut api_key)
        .map_err(|e| unreadable(&e.to_string()))?;

    Ok(SecretString::from(api_key))
}

/// Resolve the credential using the process environment
pub fn resolve_credential(
    explicit: Option<&str>,
    platform: &PlatformSettings,
    passphrase: Option<&str>,
) -> ProvisionResult<SecretString> {
    resolve_credential_with(explicit, platform, passphrase, |name| std::env::var(name).ok())
}

/// Resolve the credential with a custom environment lookup
///
/// An explicitly supplied but empty value is passed through; the platform
/// client rejects it as an authentication failure without sending anything.
pub fn resolve_credential_with<F>(
    explicit: Option<&str>,
    platform: &PlatformSettings,
    passphrase: Option<&str>,
    env_lookup: F,
) -> ProvisionResult<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    let (credential, source) = if let Some(value) = explicit {
        (SecretString::from(value.to_string()), CredentialSource::Explicit)
    } else if let Some(value) = &platform.api_key {
        match value.strip_prefix(SEALED_PREFIX) {
            Some(encoded) => (
                open_sealed(encoded, passphrase)?,
                CredentialSource::SealedSettingsFile,
            ),
            None => (SecretString::from(value.clone()), CredentialSource::SettingsFile),
        }
    } else if let Some(value) = env_lookup(&platform.api_key_env) {
        (SecretString::from(value), CredentialSource::Environment)
    } else {
        return Err(ProvisionError::Authentication(format!(
            "No API key found: pass --api-key, set platform.api_key, or export {}",
            platform.api_key_env
        )));
    };

    tracing::debug!(source = %source, "Resolved platform credential");
    Ok(credential)
}
