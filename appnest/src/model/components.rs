//! Component worklist entries and generated components.

use super::Entity;
use serde::{Deserialize, Serialize};

/// The kind of UI component to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Overview dashboard with per-table metrics.
    #[default]
    Dashboard,
    /// Create/read/update/delete interface for one entity.
    Crud,
}

impl ComponentKind {
    /// Returns the wire-format tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Crud => "crud",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the orchestrator's worklist.
///
/// CRUD entries carry the full table schema so the code generation stage
/// never has to re-derive which entity an iteration is for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentSpec {
    /// Stable identifier: `dashboard`, or `gestion_<lowercased table>`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Build priority, 1 first.
    pub priority: u32,

    /// Component kind.
    #[serde(rename = "type")]
    pub kind: ComponentKind,

    /// The entity's table name (CRUD entries only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Short description injected into the generation prompt.
    #[serde(default)]
    pub description: String,

    /// Full table schema (CRUD entries only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_schema: Option<Entity>,
}

/// Result of validating a generated component's source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    /// Whether the source satisfies the output-format constraints.
    pub is_valid: bool,

    /// Problems found, empty when valid.
    #[serde(default)]
    pub issues: Vec<String>,
}

/// One generated component, as returned by the code-generation stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneratedComponent {
    /// Identifier echoed from the requested [`ComponentSpec`].
    #[serde(default)]
    pub component_id: String,

    /// Display name echoed from the requested spec.
    #[serde(default)]
    pub component_name: String,

    /// Kind tag echoed from the requested spec.
    #[serde(default)]
    pub component_type: String,

    /// The generated JSX source.
    #[serde(default)]
    pub component_code: String,

    /// Tables the component reads or writes.
    #[serde(default)]
    pub tables_used: Vec<String>,

    /// External dependencies (expected empty).
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Agent's estimate of the source length.
    #[serde(default)]
    pub estimated_lines: u32,

    /// Agent's implementation notes.
    #[serde(default)]
    pub generation_notes: String,

    /// Source validation outcome, attached after generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_result: Option<ValidationResult>,

    /// ISO timestamp of generation.
    #[serde(default)]
    pub generated_at: String,
}

impl GeneratedComponent {
    /// Parses an agent response, falling back to an empty component.
    ///
    /// The caller is expected to restore the requested identifiers onto the
    /// result; an empty default never matches a requested spec.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(component) => component,
            Err(err) => {
                tracing::error!(error = %err, "code generation output was not valid JSON, using empty component");
                Self::default()
            }
        }
    }

    /// Returns true if the attached validation marked the source valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_result.as_ref().is_some_and(|v| v.is_valid)
    }
}
