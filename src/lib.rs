//! A durable-execution warehouse orchestration core: sagas and leaf
//! workflows that coordinate order fulfillment across picking,
//! packing, consolidation, shipping, and the facility's continuous
//! optimization and DLQ-reprocessing loops.
//!
//! Every workflow function is generic over
//! [`engine::context::WorkflowContext`], the crate's single
//! determinism boundary: activity calls, child workflows, timers, and
//! signal waits all cross it, so the same workflow code runs against a
//! real engine binding or the in-memory
//! [`engine::test_context::TestWorkflowContext`] used throughout this
//! crate's tests.

pub mod activities;
pub mod compensation;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod types;
pub mod workflows;
