//! HTTP client for the Albert chat-completions API.

use super::{AgentClient, AgentRequest, AgentResponse};
use crate::errors::PipelineError;
use async_trait::async_trait;
use std::time::Instant;

/// Client for an OpenAI-style chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct AlbertClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl AlbertClient {
    /// Creates a new client.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets a preconfigured HTTP client (timeouts, proxies).
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }
}

#[async_trait]
impl AgentClient for AlbertClient {
    async fn complete(&self, request: &AgentRequest) -> Result<AgentResponse, PipelineError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_message},
                {"role": "user", "content": request.user_message},
            ],
        });

        let started = Instant::now();
        let mut http_request = self.http.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::agent(
                request.role.as_str(),
                format!("status {status}: {body}"),
            ));
        }

        let value: serde_json::Value = response.json().await?;
        let content = value
            .pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                PipelineError::agent(request.role.as_str(), "response missing message content")
            })?
            .to_string();

        Ok(AgentResponse {
            content,
            latency_ms: Some(started.elapsed().as_secs_f64() * 1000.0),
        })
    }
}
