//! Canned payloads and schemas for pipeline tests.

use serde_json::{json, Value};

use crate::model::{Column, Entity, Relationship, Schema, UseCase, UseCaseCatalog};

/// A two-table supplier schema with one cross-table reference.
#[must_use]
pub fn sample_schema() -> Schema {
    Schema {
        business_domain: Some("Gestion Fournisseurs".to_string()),
        total_tables: 2,
        entities: vec![
            Entity {
                table_name: "Fournisseurs".to_string(),
                entity_type: "principale".to_string(),
                description: "Liste des fournisseurs".to_string(),
                columns: vec![
                    Column {
                        column_name: "nom".to_string(),
                        column_type: "Text".to_string(),
                        is_required: true,
                        is_primary: true,
                        ..Column::default()
                    },
                    Column {
                        column_name: "email".to_string(),
                        column_type: "Text".to_string(),
                        is_unique: true,
                        ..Column::default()
                    },
                ],
                relationships: Vec::new(),
            },
            Entity {
                table_name: "Produits".to_string(),
                entity_type: "principale".to_string(),
                description: "Catalogue des produits".to_string(),
                columns: vec![
                    Column {
                        column_name: "nom".to_string(),
                        column_type: "Text".to_string(),
                        is_required: true,
                        ..Column::default()
                    },
                    Column {
                        column_name: "fournisseur_id".to_string(),
                        column_type: "Int".to_string(),
                        ..Column::default()
                    },
                ],
                relationships: vec![Relationship {
                    kind: "many_to_one".to_string(),
                    target: "Fournisseurs".to_string(),
                    via: "fournisseur_id".to_string(),
                }],
            },
        ],
    }
}

/// Use cases matching [`sample_schema`].
#[must_use]
pub fn sample_use_cases() -> UseCaseCatalog {
    let uc = |uc_id: &str, description: &str, data: &[&str]| UseCase {
        uc_id: uc_id.to_string(),
        description: description.to_string(),
        data_required: data.iter().map(ToString::to_string).collect(),
    };
    UseCaseCatalog {
        all_use_cases: vec![
            uc(
                "UC_FOURNISSEURS_01",
                "Consulter la liste des fournisseurs",
                &["Fournisseurs"],
            ),
            uc(
                "UC_FOURNISSEURS_02",
                "Ajouter un nouveau fournisseur",
                &["Fournisseurs"],
            ),
            uc(
                "UC_PRODUITS_01",
                "Consulter le catalogue des produits",
                &["Produits"],
            ),
            uc(
                "UC_PRODUITS_02",
                "Associer un produit à son fournisseur",
                &["Produits", "Fournisseurs"],
            ),
        ],
        total_count: 4,
    }
}

/// The widget's wire payload for a supplier-tracking request, targeting
/// document `abc123`.
#[must_use]
pub fn supplier_webhook_body() -> Value {
    json!({
        "body": {
            "messageId": "ai_1700000000000_42",
            "message": "Je veux suivre mes fournisseurs et leurs produits",
            "mode": "chat",
            "documentId": "abc123",
            "gristBaseUrl": "https://grist.numerique.gouv.fr",
            "conversationHistory": [],
            "timestamp": "2024-11-14T22:13:20.000000+00:00",
            "version": "v5.2-with-docid"
        }
    })
}

/// Scripted responses for the four analysis agents.
#[must_use]
pub fn canned_analysis_responses() -> Vec<String> {
    let validation = json!({
        "component_roadmap": [
            {"component_id": "dashboard", "component_type": "dashboard", "priority": 1, "notes": ""},
            {"component_id": "gestion_fournisseurs", "component_type": "crud", "priority": 2, "notes": ""},
            {"component_id": "gestion_produits", "component_type": "crud", "priority": 3, "notes": ""}
        ],
        "total_components_planned": 3
    });
    vec![
        "Entités identifiées : fournisseurs et produits, avec une relation d'approvisionnement."
            .to_string(),
        serde_json::to_string(&sample_schema()).unwrap_or_default(),
        serde_json::to_string(&sample_use_cases()).unwrap_or_default(),
        validation.to_string(),
    ]
}

/// Scripted responses for a full run: four analysis agents plus one code
/// generation per worklist entry (dashboard and two CRUD components).
#[must_use]
pub fn full_run_responses() -> Vec<String> {
    let codegen = |id: &str, kind: &str| {
        json!({
            "component_id": id,
            "component_name": id,
            "component_type": kind,
            "component_code": "const Component = () => { return <div/>; };",
            "tables_used": ["Fournisseurs", "Produits"],
            "dependencies": [],
            "estimated_lines": 120,
            "generation_notes": "fixture"
        })
        .to_string()
    };

    let mut responses = canned_analysis_responses();
    responses.push(codegen("dashboard", "dashboard"));
    responses.push(codegen("gestion_fournisseurs", "crud"));
    responses.push(codegen("gestion_produits", "crud"));
    responses
}
