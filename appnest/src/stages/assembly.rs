//! Assembly stage: writes the generated application into the Grist
//! document and builds the final response.
//!
//! The document id is resolved before any side effect. When it is missing
//! the stage fails with the full run context in the error and no document
//! call is ever made; the stage never invents a placeholder id.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::context::RunContext;
use crate::errors::PipelineError;
use crate::grist::{prepare_entity_table, DocumentApi, SimpleColumn, TableToCreate};
use crate::model::GeneratedComponent;
use crate::utils::{iso_timestamp, now_millis};

/// Table holding the generated component code inside the document.
const TEMPLATES_TABLE: &str = "Templates";

/// The one operation this pipeline performs against a document.
const OPERATION: &str = "create_tables_in_current_document";

/// Write target resolved by the assembly stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GristConfig {
    /// Document API base address.
    pub base_url: String,
    /// The widget's document id, verbatim.
    pub doc_id: String,
    /// Display name recorded for the run, `AppNest_<domain>_<millis>`.
    pub doc_name: String,
    /// Always [`OPERATION`].
    pub operation: String,
}

/// Document block of the final response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GristDocument {
    /// The document written to.
    pub doc_id: String,
    /// Direct link to the document.
    pub doc_url: String,
    /// Display name recorded for the run.
    pub doc_name: String,
    /// The operation performed.
    pub operation: String,
}

/// Final pipeline response returned to the widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssemblyResponse {
    /// True when every write succeeded.
    pub success: bool,
    /// Where the application was written.
    pub grist_document: GristDocument,
    /// Counts and domain summary.
    pub summary: AssemblySummary,
    /// User-facing follow-up guidance.
    pub next_steps: Vec<String>,
    /// ISO completion timestamp.
    pub completed_at: String,
}

/// Run summary embedded in the final response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssemblySummary {
    /// Normalized business domain.
    pub business_domain: String,
    /// Tables created in the document.
    pub tables_created: usize,
    /// Reference columns added in the second pass.
    pub reference_columns_added: usize,
    /// Components stored in the Templates table.
    pub components_generated: usize,
    /// Use cases identified during analysis.
    pub use_cases_identified: usize,
}

/// Terminal stage: consumes the finished context and writes the document.
pub struct AssemblyStage {
    docs: Arc<dyn DocumentApi>,
}

impl AssemblyStage {
    /// Creates the stage around a document API.
    #[must_use]
    pub fn new(docs: Arc<dyn DocumentApi>) -> Self {
        Self { docs }
    }

    /// Resolves the write target from the context.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingDocId`] when the context carries no
    /// document id.
    pub fn resolve_target(&self, ctx: &RunContext) -> Result<GristConfig, PipelineError> {
        let doc_id = ctx.require_doc_id()?;
        let domain = ctx.business_domain.as_deref().unwrap_or("application_metier");
        Ok(GristConfig {
            base_url: ctx.grist_base_url.clone(),
            doc_id: doc_id.to_string(),
            doc_name: format!("AppNest_{domain}_{}", now_millis()),
            operation: OPERATION.to_string(),
        })
    }

    /// Writes tables, reference columns and component templates, then
    /// builds the final response.
    ///
    /// # Errors
    ///
    /// Fails fast on a missing document id; propagates any document API
    /// failure.
    pub async fn assemble(&self, ctx: &RunContext) -> Result<AssemblyResponse, PipelineError> {
        let target = self.resolve_target(ctx)?;

        let plans: Vec<_> = ctx
            .schema
            .as_ref()
            .map(|s| s.entities.iter().map(prepare_entity_table).collect())
            .unwrap_or_default();

        // Phase 1: every table exists before any Ref column points at one.
        for plan in &plans {
            self.docs.create_table(&target.doc_id, &plan.table).await?;
        }

        // Phase 2: deferred reference columns.
        let mut reference_columns = 0;
        for plan in &plans {
            if plan.references.is_empty() {
                continue;
            }
            self.docs
                .add_columns(&target.doc_id, &plan.table.id, &plan.references)
                .await?;
            reference_columns += plan.references.len();
        }

        if !ctx.generated_components.is_empty() {
            self.docs
                .create_table(&target.doc_id, &templates_table())
                .await?;
            let records: Vec<_> = ctx
                .generated_components
                .iter()
                .map(template_record)
                .collect();
            self.docs
                .add_records(&target.doc_id, TEMPLATES_TABLE, &records)
                .await?;
        }

        let doc_url = format!(
            "{}/doc/{}",
            target.base_url.trim_end_matches('/'),
            target.doc_id
        );
        info!(
            doc_id = %target.doc_id,
            doc_url = %doc_url,
            tables = plans.len(),
            components = ctx.generated_components.len(),
            "assembly complete"
        );

        Ok(AssemblyResponse {
            success: true,
            grist_document: GristDocument {
                doc_id: target.doc_id,
                doc_url: doc_url.clone(),
                doc_name: target.doc_name,
                operation: target.operation,
            },
            summary: AssemblySummary {
                business_domain: ctx
                    .business_domain
                    .clone()
                    .unwrap_or_else(|| "application_metier".to_string()),
                tables_created: plans.len(),
                reference_columns_added: reference_columns,
                components_generated: ctx.generated_components.len(),
                use_cases_identified: ctx
                    .use_cases
                    .as_ref()
                    .map_or(0, |u| u.all_use_cases.len()),
            },
            next_steps: vec![
                format!("Ouvrez votre document Grist : {doc_url}"),
                "Les tables ont été créées dans votre document actuel".to_string(),
                format!(
                    "Le code des composants générés se trouve dans la table {TEMPLATES_TABLE}"
                ),
                "Ajustez les vues et les droits d'accès selon vos besoins".to_string(),
            ],
            completed_at: iso_timestamp(),
        })
    }
}

fn templates_table() -> TableToCreate {
    let column = |id: &str, label: &str| SimpleColumn {
        id: id.to_string(),
        label: label.to_string(),
        column_type: "Text".to_string(),
    };
    TableToCreate {
        id: TEMPLATES_TABLE.to_string(),
        columns: vec![
            column("template_id", "Template ID"),
            column("template_name", "Nom"),
            column("component_type", "Type"),
            column("component_code", "Code"),
            column("tables_used", "Tables utilisées"),
            column("created_at", "Créé le"),
        ],
    }
}

fn template_record(component: &GeneratedComponent) -> serde_json::Value {
    json!({
        "template_id": component.component_id,
        "template_name": component.component_name,
        "component_type": component.component_type,
        "component_code": component.component_code,
        "tables_used": component.tables_used.join(", "),
        "created_at": component.generated_at,
    })
}
