//! OmniDimension-compatible REST client

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::agents::domain::{
    AgentConfigurationRequest, AgentCreationResponse, AgentPlatform, AgentResource, AgentSummary,
};
use crate::agents::error::{ProvisionError, ProvisionResult};
use crate::config::PlatformSettings;

/// REST client for the voice-agent platform
pub struct OmniDimClient {
    client: reqwest::Client,
    credential: SecretString,
    base_url: String,
    page_size: u32,
}

impl std::fmt::Debug for OmniDimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmniDimClient")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl OmniDimClient {
    /// Create a client; every request is bounded by `timeout_seconds`
    pub fn new(settings: &PlatformSettings, credential: SecretString) -> ProvisionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| {
                ProvisionError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            credential,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            page_size: settings.page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Address of one agent; the id always stays a single path segment
    fn agent_url(&self, id: &str) -> ProvisionResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url("agents")).map_err(|e| {
            ProvisionError::Configuration(format!("Invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ProvisionError::Configuration(format!(
                    "Base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .push(id);
        Ok(url)
    }

    /// Bearer header value; an empty credential never reaches the wire
    fn bearer(&self) -> ProvisionResult<String> {
        let token = self.credential.expose_secret().trim();
        if token.is_empty() {
            return Err(ProvisionError::Authentication(
                "API key is empty".to_string(),
            ));
        }
        Ok(format!("Bearer {}", token))
    }

    /// Send a request and map non-success statuses to errors
    async fn send(&self, request: reqwest::RequestBuilder) -> ProvisionResult<(u16, Value)> {
        let response = request
            .header("Authorization", self.bearer()?)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %error_text, "Platform returned an error");
            return Err(ProvisionError::from_status(
                status.as_u16(),
                error_message(&error_text),
                retry_after,
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProvisionError::Parse(format!("Failed to parse response: {}", e)))?;
        Ok((status.as_u16(), body))
    }
}

#[async_trait]
impl AgentPlatform for OmniDimClient {
    fn name(&self) -> &str {
        "omnidim"
    }

    async fn create_agent(
        &self,
        request: &AgentConfigurationRequest,
    ) -> ProvisionResult<AgentCreationResponse> {
        tracing::info!(agent = %request.name, url = %self.url("agents/create"), "Creating agent");

        let (status, body) = self
            .send(self.client.post(self.url("agents/create")).json(request))
            .await?;

        let resource = parse_resource(body)?;
        if resource.id.trim().is_empty() {
            return Err(ProvisionError::Parse(
                "Created agent has an empty id".to_string(),
            ));
        }

        tracing::info!(agent_id = %resource.id, status, "Agent created");
        Ok(AgentCreationResponse {
            status,
            json: resource,
        })
    }

    async fn list_agents(&self) -> ProvisionResult<Vec<AgentSummary>> {
        let page_size = self.page_size.to_string();
        let mut agents: Vec<AgentSummary> = Vec::new();
        let mut seen = HashSet::new();
        let mut page_no: u32 = 1;

        loop {
            let page_param = page_no.to_string();
            let (_, body) = self
                .send(self.client.get(self.url("agents")).query(&[
                    ("pageno", page_param.as_str()),
                    ("pagesize", page_size.as_str()),
                ]))
                .await?;

            let page = parse_listing(body)?;
            let fetched = page.agents.len();
            let mut added = 0;
            for agent in page.agents {
                if seen.insert(agent.id.clone()) {
                    agents.push(agent);
                    added += 1;
                }
            }
            tracing::debug!(page = page_no, fetched, added, "Fetched agent page");

            // Servers that ignore paging resend the same page; nothing new means done
            let exhausted = fetched < self.page_size as usize
                || added == 0
                || page
                    .total
                    .map_or(false, |total| agents.len() as u64 >= total);
            if exhausted {
                break;
            }
            page_no += 1;
        }

        tracing::debug!(count = agents.len(), pages = page_no, "Listed agents");
        Ok(agents)
    }

    async fn get_agent(&self, id: &str) -> ProvisionResult<AgentResource> {
        let (_, body) = self.send(self.client.get(self.agent_url(id)?)).await?;
        parse_resource(body)
    }
}

/// Pull a readable message out of an error body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["error", "message", "detail"]
            .iter()
            .find_map(|key| json.get(*key))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Agent descriptions come either bare or wrapped in `{"json": ...}`
fn parse_resource(body: Value) -> ProvisionResult<AgentResource> {
    let inner = match body {
        Value::Object(mut map) if !map.contains_key("id") && map.contains_key("json") => {
            map.remove("json").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner)
        .map_err(|e| ProvisionError::Parse(format!("Invalid agent description: {}", e)))
}

/// One page of an agent listing
#[derive(Debug)]
struct Listing {
    agents: Vec<AgentSummary>,
    /// Total across all pages, when the platform reports it
    total: Option<u64>,
}

/// Listings are either a bare array or an object holding one
fn parse_listing(body: Value) -> ProvisionResult<Listing> {
    let (items, total) = match body {
        Value::Array(items) => (items, None),
        Value::Object(mut map) => {
            let total = ["total_records", "total"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64));
            let items = ["bots", "agents", "data", "results"]
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| {
                    ProvisionError::Parse("Agent listing has no array of agents".to_string())
                })?;
            (items, total)
        }
        other => {
            return Err(ProvisionError::Parse(format!(
                "Unexpected agent listing: {}",
                other
            )))
        }
    };

    let agents = items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| ProvisionError::Parse(format!("Invalid agent summary: {}", e)))
        })
        .collect::<ProvisionResult<Vec<AgentSummary>>>()?;

    Ok(Listing { agents, total })
}
