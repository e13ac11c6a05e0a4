//! Orchestration stage: worklist construction and strictly sequential
//! component generation.
//!
//! The worklist is always one dashboard followed by one CRUD component per
//! main entity, capped at [`MAX_CRUD_ENTITIES`]. Generation processes the
//! worklist in batches of [`COMPONENT_BATCH_SIZE`] (one), and each
//! iteration hands the generator exactly its own worklist entry, so two
//! iterations can never produce the same component.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::agents::AgentClient;
use crate::config::{PipelineConfig, COMPONENT_BATCH_SIZE, MAX_CRUD_ENTITIES};
use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::events::get_event_sink;
use crate::model::{ComponentKind, ComponentSpec};
use crate::stages::{ComponentGenerator, Stage};

/// Builds the component worklist from the analyzed schema.
///
/// Entry ids are stable: `dashboard` for the overview, then
/// `gestion_<table>` per entity in schema order. Each CRUD entry carries
/// the full entity definition so later stages never re-resolve it.
#[must_use]
pub fn build_worklist(ctx: &RunContext) -> Vec<ComponentSpec> {
    let mut worklist = vec![ComponentSpec {
        id: "dashboard".to_string(),
        name: "Tableau de bord".to_string(),
        priority: 1,
        kind: ComponentKind::Dashboard,
        entity: None,
        description: "Vue d'ensemble avec métriques et navigation".to_string(),
        table_schema: None,
    }];

    let entities = ctx.schema.as_ref().map(|s| s.entities.as_slice()).unwrap_or_default();
    for (i, entity) in entities.iter().take(MAX_CRUD_ENTITIES).enumerate() {
        worklist.push(ComponentSpec {
            id: format!("gestion_{}", entity.table_name.to_lowercase()),
            name: format!("Gestion {}", entity.table_name),
            priority: u32::try_from(i).unwrap_or(u32::MAX).saturating_add(2),
            kind: ComponentKind::Crud,
            entity: Some(entity.table_name.clone()),
            description: format!("Interface CRUD pour gérer les {}", entity.table_name),
            table_schema: Some(entity.clone()),
        });
    }
    worklist
}

/// Stage that walks the worklist and collects generated components.
pub struct OrchestratorStage {
    generator: ComponentGenerator,
}

impl OrchestratorStage {
    /// Creates the stage around an agent client.
    #[must_use]
    pub fn new(agent: Arc<dyn AgentClient>, config: PipelineConfig) -> Self {
        Self {
            generator: ComponentGenerator::new(agent, config),
        }
    }
}

#[async_trait]
impl Stage for OrchestratorStage {
    fn name(&self) -> &'static str {
        "orchestrator"
    }

    async fn run(&self, mut ctx: RunContext) -> Result<RunContext, PipelineError> {
        let worklist = build_worklist(&ctx);
        info!(
            conversation_id = %ctx.conversation_id,
            components = worklist.len(),
            "worklist built"
        );

        let sink = get_event_sink();
        for batch in worklist.chunks(COMPONENT_BATCH_SIZE) {
            // Iterations are strictly sequential; every item in the batch is
            // named explicitly so the generator cannot fall back to a shared
            // "current component" and repeat itself.
            for component in batch {
                sink.emit(
                    "component.started",
                    Some(json!({"component_id": component.id, "priority": component.priority})),
                )
                .await;

                let generated = self.generator.generate(component, &ctx).await?;
                sink.emit(
                    "component.completed",
                    Some(json!({
                        "component_id": generated.component_id,
                        "valid": generated.is_valid(),
                    })),
                )
                .await;
                ctx.generated_components.push(generated);
            }
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_schema, ScriptedAgent};
    use crate::model::Entity;

    fn ctx_with_entities(count: usize) -> RunContext {
        let mut ctx = RunContext::new("conv_test", "besoin").with_doc_id("abc123");
        let mut schema = sample_schema();
        schema.entities = (0..count)
            .map(|i| Entity {
                table_name: format!("Table{i}"),
                ..Entity::default()
            })
            .collect();
        schema.total_tables = u32::try_from(count).unwrap_or(u32::MAX);
        ctx.schema = Some(schema);
        ctx.business_domain = Some("gestion_fournisseurs".to_string());
        ctx
    }

    #[test]
    fn test_worklist_is_dashboard_plus_capped_crud() {
        let worklist = build_worklist(&ctx_with_entities(8));
        assert_eq!(worklist.len(), 1 + MAX_CRUD_ENTITIES);
        assert_eq!(worklist[0].id, "dashboard");
        assert_eq!(worklist[0].priority, 1);
        assert_eq!(worklist[1].id, "gestion_table0");
        assert_eq!(worklist[1].priority, 2);
        assert_eq!(worklist[5].priority, 6);
        assert!(worklist[1].table_schema.is_some());
    }

    #[test]
    fn test_worklist_without_schema_is_dashboard_only() {
        let ctx = RunContext::new("conv_test", "besoin");
        let worklist = build_worklist(&ctx);
        assert_eq!(worklist.len(), 1);
        assert_eq!(worklist[0].kind, ComponentKind::Dashboard);
    }

    #[tokio::test]
    async fn test_sequential_generation_yields_distinct_components() {
        let mut ctx = RunContext::new("conv_test", "besoin").with_doc_id("abc123");
        ctx.schema = Some(sample_schema());
        ctx.business_domain = Some("gestion_fournisseurs".to_string());

        // One scripted response per worklist entry, all echoing the same id;
        // the override keeps each slot distinct anyway.
        let response = serde_json::json!({
            "component_id": "dashboard",
            "component_code": "const Component = () => null;",
        })
        .to_string();
        let stage = OrchestratorStage::new(
            Arc::new(ScriptedAgent::new(vec![response.clone(), response.clone(), response])),
            PipelineConfig::default(),
        );

        let out = stage.run(ctx).await.unwrap();
        let ids: Vec<&str> = out
            .generated_components
            .iter()
            .map(|c| c.component_id.as_str())
            .collect();
        assert_eq!(ids, vec!["dashboard", "gestion_fournisseurs", "gestion_produits"]);
    }
}
