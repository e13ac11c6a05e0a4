//! Table-plan preparation for the two-phase creation protocol.
//!
//! Reference columns (`Ref:<Target>`) can only point at tables that already
//! exist, so each entity is split into the columns created with the table
//! and the reference columns deferred to a second pass once every table is
//! in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Entity;

/// A column created together with its table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimpleColumn {
    /// Grist column id, derived from the declared name.
    pub id: String,
    /// Human-readable label, the declared column name.
    pub label: String,
    /// Grist column type (`Text`, `Int`, `Date`, ...).
    #[serde(rename = "type")]
    pub column_type: String,
}

/// A column deferred to the second pass because it references another table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceColumn {
    /// Grist column id, derived from the declared name.
    pub id: String,
    /// Human-readable label, the declared column name.
    pub label: String,
    /// Always `Ref:<Target>`.
    #[serde(rename = "type")]
    pub column_type: String,
    /// The type the column carried before being promoted to a reference.
    pub original_type: String,
    /// Relationship kind as declared in the schema.
    pub relationship: String,
}

/// First-pass creation payload for one table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableToCreate {
    /// Grist table id.
    pub id: String,
    /// Columns created with the table.
    pub columns: Vec<SimpleColumn>,
}

/// The full plan for one entity: the first-pass table plus its deferred
/// reference columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTablePlan {
    /// First-pass table definition.
    pub table: TableToCreate,
    /// Second-pass reference columns (empty when the entity has no
    /// outgoing relationships).
    pub references: Vec<ReferenceColumn>,
}

fn column_id(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Partitions an entity's columns into the first-pass table and its
/// deferred reference columns.
///
/// A column is promoted to a reference when a relationship names it as the
/// `via` column; its type becomes `Ref:<target>` and the declared type is
/// preserved in `original_type`.
#[must_use]
pub fn prepare_entity_table(entity: &Entity) -> EntityTablePlan {
    let via_map: HashMap<&str, &crate::model::Relationship> = entity
        .relationships
        .iter()
        .map(|rel| (rel.via.as_str(), rel))
        .collect();

    let mut simple = Vec::new();
    let mut references = Vec::new();

    for col in &entity.columns {
        let id = column_id(&col.column_name);
        if let Some(rel) = via_map.get(col.column_name.as_str()) {
            references.push(ReferenceColumn {
                id,
                label: col.column_name.clone(),
                column_type: format!("Ref:{}", rel.target),
                original_type: col.column_type.clone(),
                relationship: rel.kind.clone(),
            });
        } else {
            simple.push(SimpleColumn {
                id,
                label: col.column_name.clone(),
                column_type: col.column_type.clone(),
            });
        }
    }

    EntityTablePlan {
        table: TableToCreate {
            id: entity.table_name.clone(),
            columns: simple,
        },
        references,
    }
}
