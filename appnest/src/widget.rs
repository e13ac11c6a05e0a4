//! Widget-side chat client.
//!
//! Mirrors what the in-document chat widget sends: every outgoing message
//! carries the surrounding document's id and base URL so the server side
//! can write back into the same document. The payload version string is
//! bumped whenever the wire shape changes.

use serde_json::{json, Value};
use tracing::debug;

use crate::config::{HISTORY_TAIL, WIDGET_VERSION};
use crate::context::ChatTurn;
use crate::errors::PipelineError;
use crate::utils::{generate_message_id, iso_timestamp};

/// Appends the chat action to a webhook URL, reusing an existing query
/// string when there is one.
#[must_use]
pub fn chat_url(webhook_url: &str) -> String {
    let separator = if webhook_url.contains('?') { '&' } else { '?' };
    format!("{webhook_url}{separator}action=albert_chat")
}

/// Client used by the widget to talk to the pipeline webhook.
#[derive(Debug, Clone)]
pub struct WidgetClient {
    http: reqwest::Client,
    webhook_url: String,
    doc_id: Option<String>,
    grist_base_url: String,
    history: Vec<ChatTurn>,
}

impl WidgetClient {
    /// Creates a client for a webhook URL and the surrounding document.
    #[must_use]
    pub fn new(
        webhook_url: impl Into<String>,
        doc_id: Option<String>,
        grist_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
            doc_id,
            grist_base_url: grist_base_url.into(),
            history: Vec::new(),
        }
    }

    /// Replaces the underlying HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Conversation turns recorded so far.
    #[must_use]
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Builds the wire payload for one outgoing message.
    ///
    /// Only the last [`HISTORY_TAIL`] turns are sent; `documentId` is
    /// omitted entirely when the widget has none (the server warns and
    /// carries on until assembly).
    #[must_use]
    pub fn build_payload(&self, message: &str, mode: &str) -> Value {
        let tail_start = self.history.len().saturating_sub(HISTORY_TAIL);
        let mut payload = json!({
            "messageId": generate_message_id(),
            "message": message,
            "mode": mode,
            "gristBaseUrl": self.grist_base_url,
            "conversationHistory": &self.history[tail_start..],
            "timestamp": iso_timestamp(),
            "version": WIDGET_VERSION,
        });
        if let Some(doc_id) = &self.doc_id {
            payload["documentId"] = Value::String(doc_id.clone());
        }
        payload
    }

    /// Sends one chat message and records both turns in the history.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Webhook`] for a non-success status, or the
    /// transport error.
    pub async fn send_chat(&mut self, message: &str, mode: &str) -> Result<Value, PipelineError> {
        let url = chat_url(&self.webhook_url);
        let payload = self.build_payload(message, mode);
        debug!(url = %url, doc_id = ?self.doc_id, "sending chat message");

        let response = self.http.post(&url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::webhook(status.as_u16(), body));
        }
        let body: Value = response.json().await?;

        self.history.push(ChatTurn::user(message));
        if let Some(reply) = body.get("message").and_then(Value::as_str) {
            self.history.push(ChatTurn::assistant(reply));
        }
        Ok(body)
    }
}
