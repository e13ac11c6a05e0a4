//! Analysis stage: agents 1 through 4.
//!
//! Runs the business analysis, schema design, use-case and validation
//! agents in order, keeps every raw response in `agent_outputs`, and parses
//! the structured ones leniently. A response that is not valid JSON becomes
//! the corresponding empty default and the run continues.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::agents::{prompts, AgentClient, AgentRequest, AgentResponse, AgentRole};
use crate::config::PipelineConfig;
use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::model::{Schema, UseCaseCatalog, ValidationPlan};
use crate::retry::run_with_retry;
use crate::stages::Stage;
use crate::utils::domain_slug;

/// Fallback slug when the schema agent names no usable domain.
const DEFAULT_DOMAIN: &str = "application_metier";

/// Stage 1-4 wrapper: turns the user's message into a parsed schema,
/// use-case catalog and component plan.
pub struct AnalysisStage {
    agent: Arc<dyn AgentClient>,
    config: PipelineConfig,
}

impl AnalysisStage {
    /// Creates the stage around an agent client.
    #[must_use]
    pub fn new(agent: Arc<dyn AgentClient>, config: PipelineConfig) -> Self {
        Self { agent, config }
    }

    async fn invoke(
        &self,
        role: AgentRole,
        system: &str,
        user: String,
    ) -> Result<AgentResponse, PipelineError> {
        let request = AgentRequest::new(role, system, user);
        run_with_retry(&self.config.retry, || self.agent.complete(&request)).await
    }
}

#[async_trait]
impl Stage for AnalysisStage {
    fn name(&self) -> &'static str {
        "analysis"
    }

    async fn run(&self, mut ctx: RunContext) -> Result<RunContext, PipelineError> {
        let analysis = self
            .invoke(
                AgentRole::Analysis,
                prompts::ANALYSIS_SYSTEM,
                prompts::analysis_user(&ctx.user_input),
            )
            .await?;
        ctx.agent_outputs.analysis = Some(analysis.content.clone());

        let schema_raw = self
            .invoke(
                AgentRole::SchemaDesign,
                prompts::SCHEMA_SYSTEM,
                prompts::schema_user(&analysis.content),
            )
            .await?;
        let schema = Schema::parse_or_default(&schema_raw.content);
        ctx.agent_outputs.schema = Some(schema_raw.content);

        let domain = schema
            .business_domain
            .as_deref()
            .map(domain_slug)
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        if schema.entities.is_empty() {
            warn!(conversation_id = %ctx.conversation_id, "schema agent produced no entities");
        }
        info!(
            conversation_id = %ctx.conversation_id,
            business_domain = %domain,
            tables = schema.entity_count(),
            "schema designed"
        );

        let use_cases_raw = self
            .invoke(
                AgentRole::UseCases,
                prompts::USE_CASES_SYSTEM,
                prompts::use_cases_user(&schema),
            )
            .await?;
        let use_cases = UseCaseCatalog::parse_or_default(&use_cases_raw.content);
        ctx.agent_outputs.use_cases = Some(use_cases_raw.content);

        let validation_raw = self
            .invoke(
                AgentRole::Validation,
                prompts::VALIDATION_SYSTEM,
                prompts::validation_user(&schema, &use_cases),
            )
            .await?;
        let validation = ValidationPlan::parse_or_default(&validation_raw.content);
        ctx.agent_outputs.validation = Some(validation_raw.content);

        ctx.business_domain = Some(domain);
        ctx.schema = Some(schema);
        ctx.use_cases = Some(use_cases);
        ctx.validation = Some(validation);
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{canned_analysis_responses, ScriptedAgent};

    fn ctx() -> RunContext {
        RunContext::new("conv_test", "je veux suivre mes fournisseurs").with_doc_id("abc123")
    }

    #[tokio::test]
    async fn test_analysis_parses_all_agent_outputs() {
        let stage = AnalysisStage::new(
            Arc::new(ScriptedAgent::new(canned_analysis_responses())),
            PipelineConfig::default(),
        );

        let out = stage.run(ctx()).await.unwrap();
        assert_eq!(out.business_domain.as_deref(), Some("gestion_fournisseurs"));
        assert_eq!(out.schema.as_ref().unwrap().entity_count(), 2);
        assert!(out.use_cases.as_ref().unwrap().total_count > 0);
        assert!(out.agent_outputs.analysis.is_some());
        assert!(out.agent_outputs.validation.is_some());
        // Ingress fields survive untouched.
        assert_eq!(out.doc_id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_malformed_schema_degrades_to_default_domain() {
        let stage = AnalysisStage::new(
            Arc::new(ScriptedAgent::new(vec![
                "analyse libre".to_string(),
                "pas du json".to_string(),
                "toujours pas".to_string(),
                "non".to_string(),
            ])),
            PipelineConfig::default(),
        );

        let out = stage.run(ctx()).await.unwrap();
        assert_eq!(out.business_domain.as_deref(), Some("application_metier"));
        assert_eq!(out.schema.as_ref().unwrap().entity_count(), 0);
        assert_eq!(out.use_cases.as_ref().unwrap().total_count, 0);
        assert_eq!(
            out.validation.as_ref().unwrap().total_components_planned,
            0
        );
    }
}
