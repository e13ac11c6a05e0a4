//! # App Nest
//!
//! A Rust implementation of the App Nest generation pipeline for Grist.
//!
//! From one chat message sent by the in-document widget, the pipeline
//! designs a table schema, generates React components, and writes both
//! into the user's current Grist document:
//!
//! - **Typed run context**: the document identity captured at ingress
//!   travels additively through every stage
//! - **Agent stages**: analysis, schema design, use cases, validation and
//!   code generation against an OpenAI-compatible endpoint
//! - **Sequential orchestration**: one component per iteration, each
//!   bound to its own worklist entry
//! - **Two-phase assembly**: tables first, cross-table references second,
//!   always inside the document the widget runs in
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use appnest::prelude::*;
//! use std::sync::Arc;
//!
//! let runner = PipelineRunner::new(
//!     Arc::new(AlbertClient::new(config.agent_endpoint.clone(), config.agent_model.clone())),
//!     Arc::new(GristClient::new(config.grist_base_url.clone())),
//!     config,
//! );
//! let response = runner.handle_webhook(&body).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod agents;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod grist;
pub mod model;
pub mod retry;
pub mod runner;
pub mod stages;
pub mod testing;
pub mod utils;
pub mod widget;

#[cfg(test)]
mod integration_tests;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agents::{AgentClient, AgentRequest, AgentResponse, AgentRole, AlbertClient};
    pub use crate::config::PipelineConfig;
    pub use crate::context::{ChatTurn, ChatWebhookPayload, RunContext, DEFAULT_GRIST_BASE_URL};
    pub use crate::errors::PipelineError;
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::grist::{DocumentApi, GristClient};
    pub use crate::model::{
        ComponentKind, ComponentSpec, GeneratedComponent, Schema, UseCaseCatalog, ValidationPlan,
    };
    pub use crate::retry::{BackoffStrategy, JitterStrategy, RetryConfig};
    pub use crate::runner::PipelineRunner;
    pub use crate::stages::{
        AnalysisStage, AssemblyResponse, AssemblyStage, OrchestratorStage, Stage,
    };
    pub use crate::widget::WidgetClient;
}
