//! HTTP implementation of [`DocumentApi`] against the Grist REST API.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::PipelineError;
use crate::grist::{DocumentApi, ReferenceColumn, TableToCreate};

/// Grist REST client scoped to a base URL.
///
/// Endpoints follow the Grist API: `/api/docs/{doc}/tables` for table
/// creation, `/api/docs/{doc}/tables/{table}/columns` and `.../records`
/// for the second pass and record inserts.
#[derive(Debug, Clone)]
pub struct GristClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GristClient {
    /// Creates a client for the given Grist base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Sets the API key sent as a bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replaces the underlying HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<(), PipelineError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::document_api(status.as_u16(), body));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentApi for GristClient {
    async fn create_table(
        &self,
        doc_id: &str,
        table: &TableToCreate,
    ) -> Result<(), PipelineError> {
        debug!(doc_id, table_id = %table.id, columns = table.columns.len(), "creating table");
        let columns: Vec<Value> = table
            .columns
            .iter()
            .map(|c| json!({"id": c.id, "fields": {"label": c.label, "type": c.column_type}}))
            .collect();
        let body = json!({"tables": [{"id": table.id, "columns": columns}]});
        self.post(&format!("/api/docs/{doc_id}/tables"), &body).await
    }

    async fn add_columns(
        &self,
        doc_id: &str,
        table_id: &str,
        columns: &[ReferenceColumn],
    ) -> Result<(), PipelineError> {
        debug!(doc_id, table_id, columns = columns.len(), "adding reference columns");
        let columns: Vec<Value> = columns
            .iter()
            .map(|c| json!({"id": c.id, "fields": {"label": c.label, "type": c.column_type}}))
            .collect();
        let body = json!({ "columns": columns });
        self.post(&format!("/api/docs/{doc_id}/tables/{table_id}/columns"), &body)
            .await
    }

    async fn add_records(
        &self,
        doc_id: &str,
        table_id: &str,
        records: &[Value],
    ) -> Result<(), PipelineError> {
        debug!(doc_id, table_id, records = records.len(), "adding records");
        let records: Vec<Value> = records.iter().map(|r| json!({ "fields": r })).collect();
        let body = json!({ "records": records });
        self.post(&format!("/api/docs/{doc_id}/tables/{table_id}/records"), &body)
            .await
    }
}
