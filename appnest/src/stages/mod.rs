//! The pipeline stages.
//!
//! [`AnalysisStage`] and [`OrchestratorStage`] implement [`Stage`] and
//! thread the [`RunContext`] forward additively. [`AssemblyStage`] is the
//! terminal consumer: it takes the finished context and returns the typed
//! [`AssemblyResponse`] instead of another context.

mod analysis;
mod assembly;
mod codegen;
mod orchestrator;

pub use analysis::AnalysisStage;
pub use assembly::{AssemblyResponse, AssemblyStage, GristConfig, GristDocument};
pub use codegen::ComponentGenerator;
pub use orchestrator::{build_worklist, OrchestratorStage};

use async_trait::async_trait;

use crate::context::RunContext;
use crate::errors::PipelineError;

/// A context-threading pipeline stage.
///
/// Each stage receives the context by value and returns an extended copy.
/// Stages add fields; they never remove or rewrite what an earlier stage
/// (or ingress) put there.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable stage name, used in events and logs.
    fn name(&self) -> &'static str;

    /// Runs the stage.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] when the stage cannot produce a usable
    /// context. Agent response parse failures are not errors; they degrade
    /// to empty defaults.
    async fn run(&self, ctx: RunContext) -> Result<RunContext, PipelineError>;
}
