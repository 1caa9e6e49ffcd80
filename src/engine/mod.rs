//! Durable-execution client boundary (§4.7): the `WorkflowContext`
//! trait, its invocation options, the deterministic `select`
//! primitive, and (test-only) an in-memory double.

pub mod context;
pub mod options;
pub mod select;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_context;

pub use context::WorkflowContext;
pub use options::{ActivityOptions, ChildWorkflowOptions, RetryPolicy};
pub use select::{select2, select3, Either, Either3};

#[cfg(any(test, feature = "test-utils"))]
pub use test_context::TestWorkflowContext;
