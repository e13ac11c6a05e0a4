//! Table schema produced by the schema-design agent.

use serde::{Deserialize, Serialize};

/// The full table schema for the user's business domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    /// Human-readable name of the business domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_domain: Option<String>,

    /// Number of tables planned by the agent.
    #[serde(default)]
    pub total_tables: u32,

    /// The entities (tables) in the schema.
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Schema {
    /// Parses an agent response, falling back to an empty schema.
    ///
    /// Parse failures are logged and recovered: downstream stages receive
    /// `{ entities: [], total_tables: 0 }` rather than an aborted run.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(schema) => schema,
            Err(err) => {
                tracing::error!(error = %err, "schema agent output was not valid JSON, using empty schema");
                Self::default()
            }
        }
    }

    /// Returns the entity with the given table name, if present.
    #[must_use]
    pub fn entity(&self, table_name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.table_name == table_name)
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

/// One entity (table) in the schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// The Grist table name.
    pub table_name: String,

    /// Entity classification (e.g. "principale", "reference").
    #[serde(default)]
    pub entity_type: String,

    /// What the table holds.
    #[serde(default)]
    pub description: String,

    /// The table's columns.
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Relationships to other tables.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// One column of an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// The column name as designed by the agent.
    pub column_name: String,

    /// The Grist column type (e.g. "Text", "Numeric", "Date").
    #[serde(default)]
    pub column_type: String,

    /// Whether the column is required.
    #[serde(default)]
    pub is_required: bool,

    /// Whether values must be unique.
    #[serde(default)]
    pub is_unique: bool,

    /// Whether this is the primary display column.
    #[serde(default)]
    pub is_primary: bool,

    /// Column description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A relationship between two entities.
///
/// `via` names the column of the owning entity that points at `target`;
/// during assembly that column becomes a typed reference (`Ref:<target>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    /// The relationship kind (e.g. "many_to_one").
    #[serde(rename = "type", default)]
    pub kind: String,

    /// The target table name.
    pub target: String,

    /// The column of this entity carrying the reference.
    pub via: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_schema() {
        let raw = r#"{
            "business_domain": "Gestion des fournisseurs",
            "total_tables": 1,
            "entities": [{
                "table_name": "Fournisseurs",
                "entity_type": "principale",
                "description": "Liste des fournisseurs",
                "columns": [
                    {"column_name": "nom", "column_type": "Text", "is_required": true}
                ],
                "relationships": []
            }]
        }"#;

        let schema = Schema::parse_or_default(raw);
        assert_eq!(schema.total_tables, 1);
        assert_eq!(schema.entities.len(), 1);
        assert_eq!(schema.entities[0].table_name, "Fournisseurs");
        assert!(schema.entities[0].columns[0].is_required);
        assert!(!schema.entities[0].columns[0].is_unique);
    }

    #[test]
    fn test_parse_failure_yields_empty_default() {
        let schema = Schema::parse_or_default("not json at all {{");
        assert_eq!(schema.total_tables, 0);
        assert!(schema.entities.is_empty());
        assert!(schema.business_domain.is_none());
    }

    #[test]
    fn test_relationship_kind_uses_type_key() {
        let raw = r#"{"type": "many_to_one", "target": "Fournisseurs", "via": "fournisseur_id"}"#;
        let rel: Relationship = serde_json::from_str(raw).unwrap();
        assert_eq!(rel.kind, "many_to_one");
        assert_eq!(rel.via, "fournisseur_id");

        let back = serde_json::to_value(&rel).unwrap();
        assert_eq!(back["type"], "many_to_one");
    }

    #[test]
    fn test_entity_lookup() {
        let schema = Schema {
            entities: vec![Entity {
                table_name: "Produits".to_string(),
                ..Entity::default()
            }],
            ..Schema::default()
        };

        assert!(schema.entity("Produits").is_some());
        assert!(schema.entity("Inconnu").is_none());
    }
}
