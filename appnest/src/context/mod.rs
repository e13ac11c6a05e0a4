//! Run context: the typed record threaded through every pipeline stage.
//!
//! The propagation contract lives here. Every stage receives a
//! [`RunContext`], extends it, and passes it forward; its output is always
//! an additive superset of its input. A field, once set, is never dropped
//! or overwritten by a later stage.

mod ingress;
mod run;

pub use ingress::{parse_webhook_body, ChatTurn, ChatWebhookPayload};
pub use run::{AgentOutputs, RunContext, DEFAULT_GRIST_BASE_URL};
