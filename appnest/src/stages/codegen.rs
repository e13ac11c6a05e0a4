//! Stage 5 worker: generates the code for one worklist component.

use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::agents::{prompts, AgentClient, AgentRequest, AgentRole};
use crate::config::{PipelineConfig, MAX_RELATED_USE_CASES};
use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::model::{ComponentSpec, GeneratedComponent, ValidationResult};
use crate::retry::run_with_retry;
use crate::utils::iso_timestamp;

fn component_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"const\s+Component\s*=").expect("valid regex"))
}

/// Generates one component at a time on behalf of the orchestrator.
///
/// The generator never trusts the agent's echo of the component identity:
/// whatever comes back is patched to the requested spec so the worklist
/// stays authoritative.
pub struct ComponentGenerator {
    agent: Arc<dyn AgentClient>,
    config: PipelineConfig,
}

impl ComponentGenerator {
    /// Creates the generator around an agent client.
    #[must_use]
    pub fn new(agent: Arc<dyn AgentClient>, config: PipelineConfig) -> Self {
        Self { agent, config }
    }

    /// Generates the code for exactly the given worklist component.
    ///
    /// # Errors
    ///
    /// Returns an error when the agent call fails or when a CRUD component
    /// cannot be resolved against the schema.
    pub async fn generate(
        &self,
        component: &ComponentSpec,
        ctx: &RunContext,
    ) -> Result<GeneratedComponent, PipelineError> {
        let schema = ctx.schema.clone().unwrap_or_default();
        let use_cases = ctx.use_cases.clone().unwrap_or_default();
        let domain = ctx.business_domain.as_deref().unwrap_or("application_metier");

        let system = prompts::codegen_system(component, &schema, domain);
        let user = prompts::codegen_user(component, &schema, &use_cases, MAX_RELATED_USE_CASES)?;
        let request = AgentRequest::new(AgentRole::CodeGenerator, system, user);

        let response =
            run_with_retry(&self.config.retry, || self.agent.complete(&request)).await?;

        let mut generated = GeneratedComponent::parse_or_default(&response.content);

        if generated.component_id != component.id {
            if !generated.component_id.is_empty() {
                warn!(
                    requested = %component.id,
                    received = %generated.component_id,
                    "agent echoed a different component id, overriding"
                );
            }
            generated.component_id = component.id.clone();
        }
        if generated.component_name.is_empty() {
            generated.component_name = component.name.clone();
        }
        generated.component_type = component.kind.as_str().to_string();
        if generated.generated_at.is_empty() {
            generated.generated_at = iso_timestamp();
        }

        generated.validation_result = Some(validate_code(&generated.component_code));
        info!(
            component_id = %generated.component_id,
            valid = generated.is_valid(),
            estimated_lines = generated.estimated_lines,
            "component generated"
        );
        Ok(generated)
    }
}

/// Structural validation of generated component code.
///
/// The runtime contract is a `const Component = ...` declaration; anything
/// else will not mount. Issues are advisory, the component is still stored.
#[must_use]
pub fn validate_code(code: &str) -> ValidationResult {
    let mut issues = Vec::new();
    if code.trim().is_empty() {
        issues.push("component_code is empty".to_string());
    } else if !component_decl_re().is_match(code) {
        issues.push("missing `const Component =` declaration".to_string());
    }
    ValidationResult {
        is_valid: issues.is_empty(),
        issues,
    }
}
