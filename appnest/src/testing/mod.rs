//! Test doubles and fixtures shared across the crate's tests.
//!
//! Exposed as a public module so downstream users can script pipelines in
//! their own tests without hand-rolling the doubles.

mod fixtures;
mod mocks;

pub use fixtures::{
    canned_analysis_responses, full_run_responses, sample_schema, sample_use_cases,
    supplier_webhook_body,
};
pub use mocks::{DocCall, RecordingDocumentApi, ScriptedAgent};
