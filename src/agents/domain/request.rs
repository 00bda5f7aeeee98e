//! Agent creation request types
//!
//! Field names follow the platform's JSON contract, so these types serialize
//! directly into the body of the create call.

use serde::{Deserialize, Serialize};

/// Full configuration for one voice agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfigurationRequest {
    /// Display name of the agent (also the key for create-if-absent lookups)
    pub name: String,
    /// Spoken when a session starts
    pub welcome_message: String,
    /// Ordered behavioral instructions for the remote dialogue engine
    #[serde(default)]
    pub context_breakdown: Vec<ContextEntry>,
    pub transcriber: TranscriberConfig,
    pub model: ModelConfig,
    pub voice: VoiceConfig,
    #[serde(default)]
    pub post_call_actions: PostCallActions,
}

impl AgentConfigurationRequest {
    /// Collapse the set-valued fields (recipients, include) to unique values,
    /// keeping the first occurrence of each.
    pub fn normalize(mut self) -> Self {
        dedup_in_order(&mut self.post_call_actions.email.recipients);
        dedup_in_order(&mut self.post_call_actions.email.include);
        self
    }

    /// Context entries that will be active on the platform
    pub fn enabled_context(&self) -> impl Iterator<Item = &ContextEntry> {
        self.context_breakdown.iter().filter(|c| c.is_enabled)
    }
}

fn dedup_in_order<T: PartialEq>(items: &mut Vec<T>) {
    let mut i = 0;
    while i < items.len() {
        if items[..i].contains(&items[i]) {
            items.remove(i);
        } else {
            i += 1;
        }
    }
}

/// One labeled behavioral instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub title: String,
    pub body: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

impl ContextEntry {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            is_enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }
}

fn default_enabled() -> bool {
    true
}

/// Speech-to-text options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Transcription vendor (e.g. "deepgram_stream")
    pub provider: String,
    /// Silence before the caller's turn is considered finished
    #[serde(default = "default_silence_timeout_ms")]
    pub silence_timeout_ms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub numerals: bool,
    #[serde(default)]
    pub punctuate: bool,
    #[serde(default)]
    pub smart_format: bool,
    #[serde(default)]
    pub diarize: bool,
}

fn default_silence_timeout_ms() -> u32 {
    400
}

/// LLM options used by the remote dialogue engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.7
}

/// Text-to-speech options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
}

/// Actions the platform runs after a call ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostCallActions {
    #[serde(default)]
    pub email: EmailAction,
    #[serde(default)]
    pub extracted_variables: Vec<ExtractedVariable>,
}

/// Post-call email dispatch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailAction {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub include: Vec<EmailInclude>,
}

/// Sections attached to the post-call email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailInclude {
    Summary,
    ExtractedVariables,
}

impl std::fmt::Display for EmailInclude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailInclude::Summary => write!(f, "summary"),
            EmailInclude::ExtractedVariables => write!(f, "extracted_variables"),
        }
    }
}

/// A value the platform extracts from the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedVariable {
    pub key: String,
    pub prompt: String,
}

impl ExtractedVariable {
    pub fn new(key: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            prompt: prompt.into(),
        }
    }
}
