//! Pipeline runner: webhook body in, assembly response out.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{error, info};

use crate::agents::AgentClient;
use crate::config::PipelineConfig;
use crate::context::{parse_webhook_body, RunContext};
use crate::errors::PipelineError;
use crate::events::{get_event_sink, EventSink};
use crate::grist::DocumentApi;
use crate::stages::{AnalysisStage, AssemblyResponse, AssemblyStage, OrchestratorStage, Stage};

/// Drives one webhook request through analysis, orchestration and assembly.
pub struct PipelineRunner {
    agent: Arc<dyn AgentClient>,
    docs: Arc<dyn DocumentApi>,
    config: PipelineConfig,
    sink: Option<Arc<dyn EventSink>>,
}

impl PipelineRunner {
    /// Creates a runner over an agent client and a document API.
    #[must_use]
    pub fn new(
        agent: Arc<dyn AgentClient>,
        docs: Arc<dyn DocumentApi>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            agent,
            docs,
            config,
            sink: None,
        }
    }

    /// Attaches an event sink to this runner, overriding the global one.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    fn sink(&self) -> Arc<dyn EventSink> {
        self.sink.clone().unwrap_or_else(get_event_sink)
    }

    /// Handles one raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Webhook`] for an unparsable body, or
    /// whatever the run itself fails with.
    pub async fn handle_webhook(&self, body: &Value) -> Result<AssemblyResponse, PipelineError> {
        let payload = parse_webhook_body(body)?;
        let ctx = RunContext::from_webhook(payload);
        self.run(ctx).await
    }

    /// Runs the pipeline over an already-built context.
    ///
    /// # Errors
    ///
    /// Propagates the first stage failure; a missing document id surfaces
    /// from the assembly stage with the full context attached.
    pub async fn run(&self, ctx: RunContext) -> Result<AssemblyResponse, PipelineError> {
        let sink = self.sink();
        sink.emit(
            "pipeline.started",
            Some(json!({
                "conversation_id": ctx.conversation_id,
                "doc_id": ctx.doc_id,
            })),
        )
        .await;

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(AnalysisStage::new(self.agent.clone(), self.config.clone())),
            Box::new(OrchestratorStage::new(
                self.agent.clone(),
                self.config.clone(),
            )),
        ];

        let mut ctx = ctx;
        for stage in &stages {
            sink.emit("stage.started", Some(json!({"stage": stage.name()})))
                .await;
            let before = ctx.clone();
            ctx = match stage.run(ctx).await {
                Ok(next) => next,
                Err(err) => {
                    error!(stage = stage.name(), error = %err, "stage failed");
                    sink.emit(
                        "stage.failed",
                        Some(json!({"stage": stage.name(), "error": err.to_string()})),
                    )
                    .await;
                    return Err(err);
                }
            };
            debug_assert!(ctx.is_superset_of(&before), "stage dropped context fields");
            sink.emit("stage.completed", Some(json!({"stage": stage.name()})))
                .await;
        }

        let assembly = AssemblyStage::new(self.docs.clone());
        sink.emit("stage.started", Some(json!({"stage": "assembly"})))
            .await;
        let response = match assembly.assemble(&ctx).await {
            Ok(response) => response,
            Err(err) => {
                error!(stage = "assembly", error = %err, "stage failed");
                sink.emit(
                    "stage.failed",
                    Some(json!({"stage": "assembly", "error": err.to_string()})),
                )
                .await;
                return Err(err);
            }
        };
        sink.emit("stage.completed", Some(json!({"stage": "assembly"})))
            .await;

        info!(
            conversation_id = %ctx.conversation_id,
            doc_id = %response.grist_document.doc_id,
            "pipeline completed"
        );
        sink.emit(
            "pipeline.completed",
            Some(json!({
                "conversation_id": ctx.conversation_id,
                "doc_id": response.grist_document.doc_id,
                "doc_url": response.grist_document.doc_url,
            })),
        )
        .await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::testing::{
        full_run_responses, supplier_webhook_body, RecordingDocumentApi, ScriptedAgent,
    };

    fn runner(
        responses: Vec<String>,
        docs: Arc<RecordingDocumentApi>,
    ) -> PipelineRunner {
        PipelineRunner::new(
            Arc::new(ScriptedAgent::new(responses)),
            docs,
            PipelineConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_handle_webhook_end_to_end() {
        let docs = Arc::new(RecordingDocumentApi::new());
        let sink = Arc::new(CollectingEventSink::new());
        let runner = runner(full_run_responses(), docs.clone()).with_event_sink(sink.clone());

        let response = runner
            .handle_webhook(&supplier_webhook_body())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.grist_document.doc_id, "abc123");
        assert!(docs.calls().iter().all(|c| c.doc_id() == "abc123"));

        let types = sink.event_types();
        assert_eq!(types.first().map(String::as_str), Some("pipeline.started"));
        assert_eq!(types.last().map(String::as_str), Some("pipeline.completed"));
        assert_eq!(types.iter().filter(|t| *t == "stage.completed").count(), 3);
    }

    #[tokio::test]
    async fn test_stage_failure_emits_failed_event() {
        let docs = Arc::new(RecordingDocumentApi::new());
        let sink = Arc::new(CollectingEventSink::new());
        // No scripted responses: the first agent call fails.
        let runner = runner(Vec::new(), docs.clone()).with_event_sink(sink.clone());

        let body = supplier_webhook_body();
        assert!(runner.handle_webhook(&body).await.is_err());
        assert!(sink.event_types().iter().any(|t| t == "stage.failed"));
        assert!(docs.calls().is_empty());
    }
}
