//! Typed payload models for the pipeline stages.
//!
//! Each aggregate produced by an AI agent has a `parse_or_default`
//! constructor: agent output that is not valid JSON is replaced by an
//! empty-but-well-formed default and logged, so a malformed upstream
//! response degrades the run instead of aborting it.

mod components;
mod schema;
mod use_cases;
mod validation;

pub use components::{
    ComponentKind, ComponentSpec, GeneratedComponent, ValidationResult,
};
pub use schema::{Column, Entity, Relationship, Schema};
pub use use_cases::{UseCase, UseCaseCatalog};
pub use validation::{RoadmapEntry, ValidationPlan};
