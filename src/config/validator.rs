use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::agents::domain::AgentConfigurationRequest;
use crate::config::{PlatformSettings, Settings};

/// Accepted sampling temperature range for the platform's LLMs
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}

/// Local checks run before an agent request leaves the process
pub struct AgentValidator;

impl AgentValidator {
    pub fn validate(request: &AgentConfigurationRequest) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if request.name.trim().is_empty() {
            errors.push(ValidationError::MissingField("name".to_string()));
        }

        Self::validate_context(request, &mut errors);
        Self::validate_providers(request, &mut errors);
        Self::validate_post_call(request, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_context(request: &AgentConfigurationRequest, errors: &mut Vec<ValidationError>) {
        for (idx, entry) in request.context_breakdown.iter().enumerate() {
            if entry.title.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "context_breakdown[{}].title",
                    idx
                )));
            }
            if entry.body.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "context_breakdown[{}].body",
                    idx
                )));
            }
        }
    }

    fn validate_providers(request: &AgentConfigurationRequest, errors: &mut Vec<ValidationError>) {
        if request.transcriber.provider.trim().is_empty() {
            errors.push(ValidationError::MissingField("transcriber.provider".to_string()));
        }

        if request.model.model.trim().is_empty() {
            errors.push(ValidationError::MissingField("model.model".to_string()));
        }

        let temperature = request.model.temperature;
        if !temperature.is_finite() || !TEMPERATURE_RANGE.contains(&temperature) {
            errors.push(ValidationError::InvalidValue {
                field: "model.temperature".to_string(),
                reason: format!(
                    "{} is outside [{}, {}]",
                    temperature,
                    TEMPERATURE_RANGE.start(),
                    TEMPERATURE_RANGE.end()
                ),
            });
        }

        if request.voice.provider.trim().is_empty() {
            errors.push(ValidationError::MissingField("voice.provider".to_string()));
        }
        if request.voice.voice_id.trim().is_empty() {
            errors.push(ValidationError::MissingField("voice.voice_id".to_string()));
        }
    }

    fn validate_post_call(request: &AgentConfigurationRequest, errors: &mut Vec<ValidationError>) {
        let email = &request.post_call_actions.email;

        for (idx, recipient) in email.recipients.iter().enumerate() {
            if !is_valid_email(recipient) {
                errors.push(ValidationError::InvalidValue {
                    field: format!("post_call_actions.email.recipients[{}]", idx),
                    reason: format!("'{}' is not a valid email address", recipient),
                });
            }
        }

        if email.enabled && email.recipients.is_empty() {
            errors.push(ValidationError::InvalidValue {
                field: "post_call_actions.email.recipients".to_string(),
                reason: "At least one recipient is required when email is enabled".to_string(),
            });
        }

        let mut seen_keys = HashMap::new();
        for (idx, variable) in request.post_call_actions.extracted_variables.iter().enumerate() {
            if variable.key.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "post_call_actions.extracted_variables[{}].key",
                    idx
                )));
                continue;
            }
            if let Some(prev_idx) = seen_keys.insert(&variable.key, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Extracted variable '{}' appears at indices {} and {}",
                    variable.key, prev_idx, idx
                )));
            }
            if variable.prompt.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "post_call_actions.extracted_variables[{}].prompt",
                    idx
                )));
            }
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_platform(&settings.platform) {
            errors.extend(e);
        }

        // Agent text may still hold template placeholders here; only the
        // rendered request is checked field by field.
        if let Some(agent) = &settings.agent {
            if agent.name.trim().is_empty() {
                errors.push(ValidationError::MissingField("agent.name".to_string()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_platform(platform: &PlatformSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if platform.base_url.is_empty() {
            errors.push(ValidationError::MissingField("platform.base_url".to_string()));
        } else if !(platform.base_url.starts_with("http://")
            || platform.base_url.starts_with("https://"))
        {
            errors.push(ValidationError::InvalidValue {
                field: "platform.base_url".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if platform.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "platform.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if platform.page_size == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "platform.page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if platform.api_key_env.is_empty() {
            errors.push(ValidationError::MissingField("platform.api_key_env".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
