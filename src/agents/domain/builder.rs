//! Fluent construction of agent requests

use super::{
    AgentConfigurationRequest, ContextEntry, EmailAction, EmailInclude, ExtractedVariable,
    ModelConfig, PostCallActions, TranscriberConfig, VoiceConfig,
};
use crate::agents::error::{ProvisionError, ProvisionResult};
use crate::config::validator::{AgentValidator, ValidationError};

/// Builder for [`AgentConfigurationRequest`]
///
/// Nothing is sent anywhere until the built request is handed to a
/// provisioner; `build` fails if any part is missing or invalid.
#[derive(Debug, Default, Clone)]
pub struct AgentRequestBuilder {
    name: String,
    welcome_message: String,
    context: Vec<ContextEntry>,
    transcriber: Option<TranscriberConfig>,
    model: Option<ModelConfig>,
    voice: Option<VoiceConfig>,
    email: EmailAction,
    extracted_variables: Vec<ExtractedVariable>,
}

impl AgentRequestBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }

    /// Append an enabled context entry; order of calls is preserved
    pub fn context(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.context.push(ContextEntry::new(title, body));
        self
    }

    pub fn context_entry(mut self, entry: ContextEntry) -> Self {
        self.context.push(entry);
        self
    }

    pub fn transcriber(mut self, transcriber: TranscriberConfig) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn model(mut self, model: impl Into<String>, temperature: f32) -> Self {
        self.model = Some(ModelConfig {
            model: model.into(),
            temperature,
        });
        self
    }

    pub fn voice(mut self, provider: impl Into<String>, voice_id: impl Into<String>) -> Self {
        self.voice = Some(VoiceConfig {
            provider: provider.into(),
            voice_id: voice_id.into(),
        });
        self
    }

    /// Enable the post-call email and add a recipient
    pub fn email_recipient(mut self, address: impl Into<String>) -> Self {
        self.email.enabled = true;
        self.email.recipients.push(address.into());
        self
    }

    pub fn email_include(mut self, include: EmailInclude) -> Self {
        self.email.include.push(include);
        self
    }

    pub fn extract(mut self, key: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.extracted_variables
            .push(ExtractedVariable::new(key, prompt));
        self
    }

    /// Assemble without validating
    pub fn build_unchecked(self) -> ProvisionResult<AgentConfigurationRequest> {
        let mut missing = Vec::new();
        if self.transcriber.is_none() {
            missing.push(ValidationError::MissingField("transcriber".to_string()));
        }
        if self.model.is_none() {
            missing.push(ValidationError::MissingField("model".to_string()));
        }
        if self.voice.is_none() {
            missing.push(ValidationError::MissingField("voice".to_string()));
        }

        match (self.transcriber, self.model, self.voice) {
            (Some(transcriber), Some(model), Some(voice)) => Ok(AgentConfigurationRequest {
                name: self.name,
                welcome_message: self.welcome_message,
                context_breakdown: self.context,
                transcriber,
                model,
                voice,
                post_call_actions: PostCallActions {
                    email: self.email,
                    extracted_variables: self.extracted_variables,
                },
            }
            .normalize()),
            _ => Err(ProvisionError::from_validation(&missing)),
        }
    }

    /// Assemble and validate
    pub fn build(self) -> ProvisionResult<AgentConfigurationRequest> {
        let request = self.build_unchecked()?;
        AgentValidator::validate(&request).map_err(|errors| ProvisionError::from_validation(&errors))?;
        Ok(request)
    }
}
