//! Grist document API surface.
//!
//! All operations are scoped to an existing document id. There is no
//! document creation here: the widget runs inside an open Grist document
//! and the pipeline writes the generated tables into that same document.

mod client;
mod tables;

pub use client::GristClient;
pub use tables::{
    prepare_entity_table, EntityTablePlan, ReferenceColumn, SimpleColumn, TableToCreate,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::PipelineError;

/// Operations the assembly stage needs against a Grist document.
///
/// The production implementation is [`GristClient`]; tests substitute a
/// recording double.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Creates a table with its initial (non-reference) columns.
    async fn create_table(
        &self,
        doc_id: &str,
        table: &TableToCreate,
    ) -> Result<(), PipelineError>;

    /// Adds columns to an existing table.
    async fn add_columns(
        &self,
        doc_id: &str,
        table_id: &str,
        columns: &[ReferenceColumn],
    ) -> Result<(), PipelineError>;

    /// Appends records to an existing table.
    async fn add_records(
        &self,
        doc_id: &str,
        table_id: &str,
        records: &[Value],
    ) -> Result<(), PipelineError>;
}
