//! Scripted and recording doubles for the two external surfaces.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::agents::{AgentClient, AgentRequest, AgentResponse};
use crate::errors::PipelineError;
use crate::grist::{DocumentApi, ReferenceColumn, TableToCreate};

/// An agent client that replays a fixed sequence of responses.
///
/// Each call consumes the next response; running out of script is an agent
/// error, which makes missing expectations loud instead of silent.
pub struct ScriptedAgent {
    responses: Mutex<VecDeque<String>>,
    requests: Arc<Mutex<Vec<AgentRequest>>>,
}

impl ScriptedAgent {
    /// Creates an agent that replays the given responses in order.
    #[must_use]
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl AgentClient for ScriptedAgent {
    async fn complete(&self, request: &AgentRequest) -> Result<AgentResponse, PipelineError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .map(AgentResponse::new)
            .ok_or_else(|| {
                PipelineError::agent(request.role.as_str(), "no scripted response left")
            })
    }
}

/// One recorded document API call.
#[derive(Debug, Clone, PartialEq)]
pub enum DocCall {
    /// A `create_table` call.
    CreateTable {
        /// Target document.
        doc_id: String,
        /// Created table.
        table_id: String,
        /// First-pass column count.
        columns: usize,
    },
    /// An `add_columns` call.
    AddColumns {
        /// Target document.
        doc_id: String,
        /// Target table.
        table_id: String,
        /// Reference column count.
        columns: usize,
    },
    /// An `add_records` call.
    AddRecords {
        /// Target document.
        doc_id: String,
        /// Target table.
        table_id: String,
        /// Record count.
        records: usize,
    },
}

impl DocCall {
    /// The document id this call targeted.
    #[must_use]
    pub fn doc_id(&self) -> &str {
        match self {
            Self::CreateTable { doc_id, .. }
            | Self::AddColumns { doc_id, .. }
            | Self::AddRecords { doc_id, .. } => doc_id,
        }
    }
}

/// A document API that records every call and always succeeds.
#[derive(Default)]
pub struct RecordingDocumentApi {
    calls: Mutex<Vec<DocCall>>,
}

impl RecordingDocumentApi {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<DocCall> {
        self.calls.lock().clone()
    }

    /// Number of `create_table` calls recorded.
    #[must_use]
    pub fn table_creation_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, DocCall::CreateTable { .. }))
            .count()
    }
}

#[async_trait]
impl DocumentApi for RecordingDocumentApi {
    async fn create_table(
        &self,
        doc_id: &str,
        table: &TableToCreate,
    ) -> Result<(), PipelineError> {
        self.calls.lock().push(DocCall::CreateTable {
            doc_id: doc_id.to_string(),
            table_id: table.id.clone(),
            columns: table.columns.len(),
        });
        Ok(())
    }

    async fn add_columns(
        &self,
        doc_id: &str,
        table_id: &str,
        columns: &[ReferenceColumn],
    ) -> Result<(), PipelineError> {
        self.calls.lock().push(DocCall::AddColumns {
            doc_id: doc_id.to_string(),
            table_id: table_id.to_string(),
            columns: columns.len(),
        });
        Ok(())
    }

    async fn add_records(
        &self,
        doc_id: &str,
        table_id: &str,
        records: &[Value],
    ) -> Result<(), PipelineError> {
        self.calls.lock().push(DocCall::AddRecords {
            doc_id: doc_id.to_string(),
            table_id: table_id.to_string(),
            records: records.len(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentRole;

    #[tokio::test]
    async fn test_scripted_agent_replays_in_order_then_errors() {
        let agent = ScriptedAgent::new(vec!["un".to_string(), "deux".to_string()]);
        let request = AgentRequest::new(AgentRole::Analysis, "sys", "user");

        assert_eq!(agent.complete(&request).await.unwrap().content, "un");
        assert_eq!(agent.complete(&request).await.unwrap().content, "deux");
        assert!(agent.complete(&request).await.is_err());
        assert_eq!(agent.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_recording_api_captures_calls() {
        let api = RecordingDocumentApi::new();
        let table = TableToCreate {
            id: "Fournisseurs".to_string(),
            columns: Vec::new(),
        };
        api.create_table("abc123", &table).await.unwrap();
        api.add_records("abc123", "Fournisseurs", &[]).await.unwrap();

        assert_eq!(api.table_creation_count(), 1);
        assert_eq!(api.calls().len(), 2);
        assert_eq!(api.calls()[1].doc_id(), "abc123");
    }
}
