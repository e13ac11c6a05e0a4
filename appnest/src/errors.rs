//! Error types for the appnest pipeline.
//!
//! The taxonomy follows the run-level error handling contract: upstream
//! parse failures are recovered locally (see the `parse_or_default`
//! constructors in [`crate::model`]) and never surface here; everything in
//! this module aborts the current run and is surfaced to the caller.

use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The assembly stage requires a propagated `doc_id` and did not get
    /// one. Carries the full received context so the caller can trace which
    /// upstream stage dropped the field.
    #[error(
        "missing required field 'doc_id' at assembly ingress; the current document \
         identifier must be propagated from the widget through every stage. \
         Received context: {context}"
    )]
    MissingDocId {
        /// The serialized run context received by the assembly stage.
        context: String,
    },

    /// An AI agent invocation failed.
    #[error("agent '{agent}' call failed: {reason}")]
    Agent {
        /// The agent that failed.
        agent: String,
        /// The reason for the failure.
        reason: String,
    },

    /// The widget's webhook POST returned a non-success status.
    #[error("webhook request failed with status {status}: {body}")]
    Webhook {
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnosis.
        body: String,
    },

    /// A document API call returned a non-success status.
    #[error("document API request failed with status {status}: {body}")]
    DocumentApi {
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnosis.
        body: String,
    },

    /// An HTTP transport error (connection, timeout, DNS).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Creates a missing-doc-id error embedding the offending context.
    #[must_use]
    pub fn missing_doc_id(context: impl Into<String>) -> Self {
        Self::MissingDocId {
            context: context.into(),
        }
    }

    /// Creates an agent failure error.
    #[must_use]
    pub fn agent(agent: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Agent {
            agent: agent.into(),
            reason: reason.into(),
        }
    }

    /// Creates a webhook failure error.
    #[must_use]
    pub fn webhook(status: u16, body: impl Into<String>) -> Self {
        Self::Webhook {
            status,
            body: body.into(),
        }
    }

    /// Creates a document API failure error.
    #[must_use]
    pub fn document_api(status: u16, body: impl Into<String>) -> Self {
        Self::DocumentApi {
            status,
            body: body.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is the fatal missing-doc-id precondition error.
    #[must_use]
    pub fn is_missing_doc_id(&self) -> bool {
        matches!(self, Self::MissingDocId { .. })
    }
}
