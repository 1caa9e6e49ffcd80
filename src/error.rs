//! Error taxonomy for the orchestration core.
//!
//! Mirrors the reference framework's per-concern `thiserror` enums
//! (`DlqError`, `CompensationError`, `ConfigError`): every failure mode
//! is a named variant, not a generic boxed error.

use thiserror::Error;

/// Errors an activity invocation can surface to the calling workflow step.
///
/// The four kinds map directly onto the error-handling design's retry
/// discipline: `Validation`/`NotFound`/`Conflict` are non-retryable and
/// short-circuit the activity retry policy; `Transient` is retried up
/// to the configured attempt count before propagating.
#[derive(Debug, Clone, Error)]
pub enum ActivityError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transient failure: {0}")]
    Transient(String),
}

impl ActivityError {
    /// Whether the activity retry policy should attempt another try.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActivityError::Transient(_))
    }
}

/// Errors raised by the workflow-context boundary itself (timers, signals,
/// child workflows) as opposed to activity-level failures.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("signal wait timed out after {0:?}")]
    SignalTimeout(std::time::Duration),

    #[error("child workflow {0} failed: {1}")]
    ChildWorkflowFailed(String, String),

    #[error("workflow execution cancelled")]
    Cancelled,
}

/// Errors from compensation (best-effort undo) activities.
///
/// Compensation failures never propagate as the saga's terminal error —
/// they are logged and left for manual reconciliation — but are typed so
/// callers can still distinguish "nothing to release" from "release call
/// itself failed".
#[derive(Debug, Clone, Error)]
pub enum CompensationError {
    #[error("no reservation held for {0}, nothing to release")]
    NothingToRelease(String),

    #[error("release activity failed: {0}")]
    ReleaseFailed(String),
}

/// Errors loading or validating `WarehouseConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Top-level workflow failure, composing the six error kinds from the
/// error-handling design (§7) into one typed enum rather than a string tag.
#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("compensable failure: {0}")]
    Compensable(String),

    #[error(transparent)]
    Compensation(#[from] CompensationError),
}
