//! Pipeline configuration and hard resource bounds.

use crate::context::DEFAULT_GRIST_BASE_URL;
use crate::retry::RetryConfig;

/// Maximum number of schema entities that get a CRUD component.
///
/// A hard resource bound: each CRUD component costs one code-generation
/// invocation whose prompt embeds the full table schema, and the downstream
/// agent has a per-invocation context-size limit.
pub const MAX_CRUD_ENTITIES: usize = 5;

/// Maximum number of related use cases embedded in a CRUD prompt.
pub const MAX_RELATED_USE_CASES: usize = 5;

/// Number of trailing conversation turns the widget sends with a message.
pub const HISTORY_TAIL: usize = 5;

/// Worklist batch size: components are generated strictly one at a time.
pub const COMPONENT_BATCH_SIZE: usize = 1;

/// Version marker the widget includes in its webhook payloads.
pub const WIDGET_VERSION: &str = "v5.2-with-docid";

/// Configuration for one pipeline deployment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Default base address of the document API, used when the widget
    /// omits one.
    pub grist_base_url: String,

    /// Chat-completions endpoint of the AI provider.
    pub agent_endpoint: String,

    /// Model name passed to the AI provider.
    pub agent_model: String,

    /// Bearer token for the AI provider, if required.
    pub agent_api_key: Option<String>,

    /// Bearer token for the document API, if required.
    pub grist_api_key: Option<String>,

    /// Retry policy for outbound agent and document API calls.
    pub retry: RetryConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grist_base_url: DEFAULT_GRIST_BASE_URL.to_string(),
            agent_endpoint: "https://albert.api.etalab.gouv.fr/v1/chat/completions".to_string(),
            agent_model: "albert-large".to_string(),
            agent_api_key: None,
            grist_api_key: None,
            retry: RetryConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document API base address.
    #[must_use]
    pub fn with_grist_base_url(mut self, url: impl Into<String>) -> Self {
        self.grist_base_url = url.into();
        self
    }

    /// Sets the AI provider endpoint.
    #[must_use]
    pub fn with_agent_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.agent_endpoint = endpoint.into();
        self
    }

    /// Sets the AI provider model.
    #[must_use]
    pub fn with_agent_model(mut self, model: impl Into<String>) -> Self {
        self.agent_model = model.into();
        self
    }

    /// Sets the AI provider token.
    #[must_use]
    pub fn with_agent_api_key(mut self, key: impl Into<String>) -> Self {
        self.agent_api_key = Some(key.into());
        self
    }

    /// Sets the document API token.
    #[must_use]
    pub fn with_grist_api_key(mut self, key: impl Into<String>) -> Self {
        self.grist_api_key = Some(key.into());
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.grist_base_url, DEFAULT_GRIST_BASE_URL);
        assert_eq!(config.retry.max_attempts, 1);
        assert!(config.agent_api_key.is_none());
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::new()
            .with_grist_base_url("https://grist.example.org")
            .with_agent_model("albert-small")
            .with_agent_api_key("secret");

        assert_eq!(config.grist_base_url, "https://grist.example.org");
        assert_eq!(config.agent_model, "albert-small");
        assert_eq!(config.agent_api_key.as_deref(), Some("secret"));
    }
}
