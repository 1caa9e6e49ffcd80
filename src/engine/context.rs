//! `WorkflowContext` — the single trait workflow bodies are generic
//! over (§4.7). Grounded on the reference framework's transport-boundary
//! discipline (`SagaRetryContext`, `ProcessManagerContext`): the same
//! orchestration function runs unmodified against a live durable-
//! execution backend or an in-process test double.
//!
//! No workflow body may call `tokio::time::Instant::now()`, touch
//! `rand`, or perform native I/O directly — everything routes through
//! this trait, which is the determinism boundary from §5.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::engine::options::{ActivityOptions, ChildWorkflowOptions};
use crate::error::{ActivityError, EngineError};

#[async_trait]
pub trait WorkflowContext: Send + Sync {
    /// Invokes an activity by name with the given input, applying the
    /// supplied retry/timeout options. Retries up to
    /// `options.retry.max_attempts` on `ActivityError::is_retryable()`
    /// variants; non-retryable variants return immediately.
    async fn execute_activity<I, O>(
        &self,
        activity: &'static str,
        input: I,
        options: &ActivityOptions,
    ) -> Result<O, ActivityError>
    where
        I: Serialize + Send + 'async_trait,
        O: DeserializeOwned;

    /// Starts and awaits a child workflow on the given task queue.
    async fn start_child_workflow<I, O>(
        &self,
        workflow_type: &'static str,
        workflow_id: String,
        input: I,
        options: &ChildWorkflowOptions,
    ) -> Result<O, EngineError>
    where
        I: Serialize + Send + 'async_trait,
        O: DeserializeOwned;

    /// Suspends until `duration` has elapsed according to the engine's
    /// notion of time, a durable checkpoint rather than a wall-clock
    /// sleep.
    async fn new_timer(&self, duration: Duration);

    /// Suspends until a signal of the given name is delivered, then
    /// returns its deserialized payload.
    async fn wait_for_signal<S>(&self, signal_name: &'static str) -> S
    where
        S: DeserializeOwned;

    /// The engine's deterministic notion of "now" — safe to call from
    /// workflow code because it is a recorded, replayable value.
    fn now(&self) -> DateTime<Utc>;

    /// Deterministic "version for change" oracle (§9 "Versioning"):
    /// returns a recorded integer in `[min_supported, max_supported]`
    /// so a workflow can branch between legacy and new logic paths
    /// consistently across replay.
    fn get_version(&self, change_id: &str, min_supported: i32, max_supported: i32) -> i32;
}
