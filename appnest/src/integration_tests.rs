//! End-to-end pipeline tests over scripted agents and a recording
//! document API.

use std::sync::Arc;

use serde_json::json;

use crate::config::PipelineConfig;
use crate::runner::PipelineRunner;
use crate::testing::{
    full_run_responses, supplier_webhook_body, DocCall, RecordingDocumentApi, ScriptedAgent,
};

fn runner(responses: Vec<String>, docs: Arc<RecordingDocumentApi>) -> PipelineRunner {
    PipelineRunner::new(
        Arc::new(ScriptedAgent::new(responses)),
        docs,
        PipelineConfig::default(),
    )
}

#[tokio::test]
async fn test_doc_id_travels_from_webhook_to_every_write() {
    let docs = Arc::new(RecordingDocumentApi::new());
    let runner = runner(full_run_responses(), docs.clone());

    let response = runner
        .handle_webhook(&supplier_webhook_body())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.grist_document.doc_id, "abc123");
    assert_eq!(
        response.grist_document.doc_url,
        "https://grist.numerique.gouv.fr/doc/abc123"
    );
    assert!(!response.grist_document.doc_name.contains("NEW_DOC"));

    let calls = docs.calls();
    assert!(!calls.is_empty());
    assert!(calls.iter().all(|c| c.doc_id() == "abc123"));
    // Fournisseurs, Produits, then the Templates table.
    assert_eq!(docs.table_creation_count(), 3);
}

#[tokio::test]
async fn test_missing_doc_id_fails_assembly_with_zero_writes() {
    let docs = Arc::new(RecordingDocumentApi::new());
    let runner = runner(full_run_responses(), docs.clone());

    let body = json!({
        "message": "Je veux suivre mes fournisseurs",
        "gristBaseUrl": "https://grist.numerique.gouv.fr"
    });
    let err = runner.handle_webhook(&body).await.unwrap_err();

    assert!(err.is_missing_doc_id());
    // The error carries the run context for diagnosis.
    assert!(err.to_string().contains("Received context"));
    assert!(err.to_string().contains("Je veux suivre mes fournisseurs"));
    assert_eq!(docs.calls().len(), 0);
}

#[tokio::test]
async fn test_snake_case_spellings_are_accepted() {
    let docs = Arc::new(RecordingDocumentApi::new());
    let runner = runner(full_run_responses(), docs.clone());

    let body = json!({
        "user_input": "Je veux suivre mes fournisseurs et leurs produits",
        "doc_id": "abc123",
        "grist_base_url": "https://grist.numerique.gouv.fr"
    });
    let response = runner.handle_webhook(&body).await.unwrap();
    assert_eq!(response.grist_document.doc_id, "abc123");
}

#[tokio::test]
async fn test_generated_components_land_in_templates_table() {
    let docs = Arc::new(RecordingDocumentApi::new());
    let runner = runner(full_run_responses(), docs.clone());

    let response = runner
        .handle_webhook(&supplier_webhook_body())
        .await
        .unwrap();
    assert_eq!(response.summary.components_generated, 3);

    let calls = docs.calls();
    let records = calls
        .iter()
        .find_map(|c| match c {
            DocCall::AddRecords {
                table_id, records, ..
            } if table_id == "Templates" => Some(*records),
            _ => None,
        })
        .unwrap();
    assert_eq!(records, 3);

    // References are only added once every table exists.
    let first_ref = calls
        .iter()
        .position(|c| matches!(c, DocCall::AddColumns { .. }))
        .unwrap();
    let entity_tables = calls
        .iter()
        .take(first_ref)
        .filter(|c| matches!(c, DocCall::CreateTable { .. }))
        .count();
    assert_eq!(entity_tables, 2);
}

#[tokio::test]
async fn test_malformed_agent_output_degrades_instead_of_aborting() {
    let docs = Arc::new(RecordingDocumentApi::new());
    // Schema, use-case and validation agents all answer prose; only the
    // dashboard remains on the worklist and its generation also fails to
    // parse.
    let responses = vec![
        "Analyse du besoin.".to_string(),
        "Voici le schéma que je propose...".to_string(),
        "Les cas d'usage sont nombreux.".to_string(),
        "Tout me semble cohérent.".to_string(),
        "Et voilà le composant !".to_string(),
    ];
    let runner = runner(responses, docs.clone());

    let response = runner
        .handle_webhook(&supplier_webhook_body())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.summary.business_domain, "application_metier");
    assert_eq!(response.summary.tables_created, 0);
    assert_eq!(response.summary.components_generated, 1);
    assert_eq!(response.summary.use_cases_identified, 0);

    // The only writes are the Templates table and its single record.
    assert_eq!(docs.table_creation_count(), 1);
}
