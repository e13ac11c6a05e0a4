//! Webhook ingress: from the widget's POST body to a [`RunContext`].

use super::{RunContext, DEFAULT_GRIST_BASE_URL};
use crate::errors::PipelineError;
use crate::utils::generate_conversation_id;
use serde::{Deserialize, Serialize};

/// One turn of the widget's conversation history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    /// `user` or `assistant`.
    pub role: String,
    /// The turn's text.
    pub content: String,
}

impl ChatTurn {
    /// Creates a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// The chat webhook body.
///
/// Serialized in the widget's camelCase wire format; deserialization also
/// accepts the snake_case spellings used between pipeline stages
/// (`doc_id`, `grist_base_url`, `user_input`, `conversation_id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatWebhookPayload {
    /// Message identifier (`ai_<millis>_<n>`).
    #[serde(
        rename = "messageId",
        alias = "message_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub message_id: Option<String>,

    /// The chat message.
    #[serde(alias = "user_input", default)]
    pub message: String,

    /// Widget interaction mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Identifier of the enclosing document.
    #[serde(
        rename = "documentId",
        alias = "doc_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub doc_id: Option<String>,

    /// Base address of the document API.
    #[serde(
        rename = "gristBaseUrl",
        alias = "grist_base_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub grist_base_url: Option<String>,

    /// Existing conversation identifier, if the session already has one.
    #[serde(
        rename = "conversationId",
        alias = "conversation_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub conversation_id: Option<String>,

    /// Tail of the conversation history.
    #[serde(rename = "conversationHistory", alias = "conversation_history", default)]
    pub conversation_history: Vec<ChatTurn>,

    /// ISO timestamp of submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Widget version marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Parses a raw webhook body into a payload.
///
/// Some webhook hosts wrap the POST body in a `body` envelope; both the
/// wrapped and the bare shape are accepted.
pub fn parse_webhook_body(raw: &serde_json::Value) -> Result<ChatWebhookPayload, PipelineError> {
    let data = raw.get("body").unwrap_or(raw);
    Ok(serde_json::from_value(data.clone())?)
}

impl RunContext {
    /// Builds the run context from an inbound webhook payload.
    ///
    /// A missing `doc_id` is logged as a warning but is not fatal here;
    /// fatality is deferred to the assembly stage, which is the first point
    /// that would otherwise write into the wrong document.
    #[must_use]
    pub fn from_webhook(payload: ChatWebhookPayload) -> Self {
        let conversation_id = payload
            .conversation_id
            .or(payload.message_id)
            .unwrap_or_else(generate_conversation_id);

        if payload.doc_id.is_none() {
            tracing::warn!(
                conversation_id = %conversation_id,
                "no doc_id received from the widget; the run will fail at assembly unless one is provided"
            );
        }

        let mut ctx = Self::new(conversation_id, payload.message);
        ctx.doc_id = payload.doc_id;
        ctx.grist_base_url = payload
            .grist_base_url
            .unwrap_or_else(|| DEFAULT_GRIST_BASE_URL.to_string());
        ctx
    }
}
