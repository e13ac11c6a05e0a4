//! The typed run context.

use crate::errors::PipelineError;
use crate::model::{GeneratedComponent, Schema, UseCaseCatalog, ValidationPlan};
use serde::{Deserialize, Serialize};

/// Default base address of the Grist document API, used when the widget
/// omits one.
pub const DEFAULT_GRIST_BASE_URL: &str = "https://grist.numerique.gouv.fr";

/// Raw agent responses, kept alongside their parsed counterparts for
/// diagnosis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentOutputs {
    /// Agent 1 (analysis) raw output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    /// Agent 2 (schema design) raw output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Agent 3 (use cases) raw output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<String>,

    /// Agent 4 (validation) raw output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
}

/// The evolving state of one pipeline run.
///
/// Created at webhook ingress, extended additively by each stage, and
/// consumed by the assembly stage; never persisted beyond one run.
///
/// `doc_id` originates from the widget and must arrive unchanged at the
/// assembly stage; it is optional here because its absence is only fatal
/// there (see [`RunContext::require_doc_id`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunContext {
    /// Opaque session identifier, generated once at ingress if absent.
    pub conversation_id: String,

    /// Identifier of the target document, as sent by the widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    /// Base address of the document API. Set once at ingress.
    pub grist_base_url: String,

    /// The user's chat message.
    pub user_input: String,

    /// ISO timestamp of ingress.
    pub received_at: String,

    /// Normalized business-domain slug, set by the analysis stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_domain: Option<String>,

    /// Raw agent responses.
    #[serde(default)]
    pub agent_outputs: AgentOutputs,

    /// Parsed table schema, set by the analysis stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    /// Parsed use-case catalog, set by the analysis stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<UseCaseCatalog>,

    /// Parsed component plan, set by the analysis stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationPlan>,

    /// Components collected by the orchestration stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated_components: Vec<GeneratedComponent>,
}

impl RunContext {
    /// Creates a fresh context for one run.
    #[must_use]
    pub fn new(conversation_id: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            doc_id: None,
            grist_base_url: DEFAULT_GRIST_BASE_URL.to_string(),
            user_input: user_input.into(),
            received_at: crate::utils::iso_timestamp(),
            business_domain: None,
            agent_outputs: AgentOutputs::default(),
            schema: None,
            use_cases: None,
            validation: None,
            generated_components: Vec::new(),
        }
    }

    /// Sets the document identifier.
    #[must_use]
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Sets the document API base address.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.grist_base_url = base_url.into();
        self
    }

    /// Returns the document identifier, or the fatal precondition error.
    ///
    /// The error embeds the full serialized context so the caller can trace
    /// which upstream stage dropped the field.
    pub fn require_doc_id(&self) -> Result<&str, PipelineError> {
        self.doc_id.as_deref().ok_or_else(|| {
            let context = serde_json::to_string_pretty(self)
                .unwrap_or_else(|_| "<unserializable context>".to_string());
            PipelineError::missing_doc_id(context)
        })
    }

    /// Returns the document URL (`<base>/doc/<doc_id>`), if a `doc_id` is set.
    #[must_use]
    pub fn doc_url(&self) -> Option<String> {
        self.doc_id
            .as_deref()
            .map(|id| format!("{}/doc/{}", self.grist_base_url, id))
    }

    /// Checks the additive-superset invariant against an earlier context.
    ///
    /// Every field already set in `earlier` must still be present and equal
    /// here; fields that were unset (or empty collections) may take any
    /// value. Intended for tests and debug assertions at stage boundaries.
    #[must_use]
    pub fn is_superset_of(&self, earlier: &Self) -> bool {
        let Ok(serde_json::Value::Object(new)) = serde_json::to_value(self) else {
            return false;
        };
        let Ok(serde_json::Value::Object(old)) = serde_json::to_value(earlier) else {
            return false;
        };

        old.iter().all(|(key, old_value)| {
            if old_value.is_null() {
                return true;
            }
            if old_value.as_array().is_some_and(Vec::is_empty) {
                return true;
            }
            if old_value.as_object().is_some_and(serde_json::Map::is_empty) {
                return true;
            }
            // agent_outputs grows field by field; skip the equality check.
            if key == "agent_outputs" {
                return true;
            }
            new.get(key) == Some(old_value)
        })
    }
}
