//! Invocation options attached at each activity / child-workflow call
//! site (§4.1, §4.7). Constructed once from `WarehouseConfig` at
//! workflow-start time — never read fresh mid-workflow, to stay
//! replay-safe.

use std::time::Duration;

use crate::config::{ActivityTimeouts, RetryPolicyConfig, WarehouseConfig};

/// Exponential backoff preset carried on an `ActivityOptions`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub backoff_coefficient: f64,
    pub max_interval: Duration,
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryPolicyConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            initial_interval: Duration::from_secs(cfg.initial_interval_secs),
            backoff_coefficient: cfg.backoff_coefficient,
            max_interval: Duration::from_secs(cfg.max_interval_secs),
        }
    }

    /// The delay before the given zero-based attempt, capped at
    /// `max_interval`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scaled = self.initial_interval.as_secs_f64() * self.backoff_coefficient.powi(attempt as i32);
        Duration::from_secs_f64(scaled.min(self.max_interval.as_secs_f64()))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryPolicyConfig::default())
    }
}

/// `scheduleToClose`/`startToClose`/heartbeat/retry bundle attached to
/// an activity invocation.
#[derive(Debug, Clone)]
pub struct ActivityOptions {
    pub schedule_to_close: Duration,
    pub start_to_close: Duration,
    pub heartbeat: Duration,
    pub retry: RetryPolicy,
}

impl ActivityOptions {
    pub fn from_config(config: &WarehouseConfig) -> Self {
        Self::with_timeouts(&config.activity_timeouts, &config.retry_policy)
    }

    pub fn with_timeouts(timeouts: &ActivityTimeouts, retry: &RetryPolicyConfig) -> Self {
        Self {
            schedule_to_close: timeouts.schedule_to_close(),
            start_to_close: timeouts.start_to_close(),
            heartbeat: timeouts.heartbeat(),
            retry: RetryPolicy::from_config(retry),
        }
    }

    /// A best-effort variant with a single attempt, for steps the spec
    /// marks "log and continue" rather than fatal (§7 kind 6).
    pub fn best_effort(mut self) -> Self {
        self.retry.max_attempts = 1;
        self
    }
}

impl Default for ActivityOptions {
    fn default() -> Self {
        Self::from_config(&WarehouseConfig::default())
    }
}

/// Task queue + execution timeout passed explicitly at each
/// child-workflow invocation site (§6).
#[derive(Debug, Clone)]
pub struct ChildWorkflowOptions {
    pub task_queue: &'static str,
    pub execution_timeout: Duration,
}

impl ChildWorkflowOptions {
    pub fn new(task_queue: &'static str, execution_timeout: Duration) -> Self {
        Self {
            task_queue,
            execution_timeout,
        }
    }
}
