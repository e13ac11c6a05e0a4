//! External AI agent seam.
//!
//! Every semantic transformation in the pipeline (analysis, schema design,
//! use cases, validation, code generation) is an invocation of an external
//! agent behind the [`AgentClient`] trait. The production implementation is
//! [`AlbertClient`]; tests use `testing::ScriptedAgent`.

mod albert;
pub mod prompts;

pub use albert::AlbertClient;

use crate::errors::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The role an agent invocation plays in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Agent 1: business-need analysis.
    Analysis,
    /// Agent 2: table schema design.
    SchemaDesign,
    /// Agent 3: use-case identification.
    UseCases,
    /// Agent 4: component plan validation.
    Validation,
    /// Agent 5: component code generation.
    CodeGenerator,
}

impl AgentRole {
    /// Returns the role's stable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::SchemaDesign => "schema_design",
            Self::UseCases => "use_cases",
            Self::Validation => "validation",
            Self::CodeGenerator => "code_generator",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One agent invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Which agent is being invoked.
    pub role: AgentRole,
    /// The system message (role statement and constraints).
    pub system_message: String,
    /// The user message (stage-specific content).
    pub user_message: String,
}

impl AgentRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(
        role: AgentRole,
        system_message: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            role,
            system_message: system_message.into(),
            user_message: user_message.into(),
        }
    }
}

/// The agent's response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The response text.
    pub content: String,
    /// Round-trip latency, when measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
}

impl AgentResponse {
    /// Creates a response from plain content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            latency_ms: None,
        }
    }
}

/// Trait for invoking an external AI agent.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Performs one agent invocation.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Agent` or `PipelineError::Http` on failure;
    /// the caller surfaces it, there is no implicit retry.
    async fn complete(&self, request: &AgentRequest) -> Result<AgentResponse, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(AgentRole::Analysis.as_str(), "analysis");
        assert_eq!(AgentRole::CodeGenerator.to_string(), "code_generator");
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(AgentRole::SchemaDesign).unwrap(),
            serde_json::json!("schema_design")
        );
    }
}
