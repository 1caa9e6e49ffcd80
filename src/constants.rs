//! Shared primitives: task queue names, timeout/retry presets, and the
//! wave-timeout-by-priority helper used across workflows.
//!
//! Kept as compile-time constants per Design Notes §9 ("process-wide
//! constants... are compile-time configuration"); per-instance values
//! (facility id, thresholds) live in `WarehouseConfig` instead.

use std::time::Duration;

use crate::types::order::Priority;

/// Default task queue for sagas and leaf workflows that don't bind to a
/// dedicated queue.
pub const ORCHESTRATOR_QUEUE: &str = "orchestrator";
pub const WES_EXECUTION_QUEUE: &str = "wes-execution-queue";
pub const PICKING_QUEUE: &str = "picking-queue";
pub const PACKING_QUEUE: &str = "packing-queue";
pub const CONSOLIDATION_QUEUE: &str = "consolidation-queue";
pub const SHIPPING_QUEUE: &str = "shipping-queue";

/// Default activity `scheduleToClose` timeout (§4.1).
pub const DEFAULT_SCHEDULE_TO_CLOSE: Duration = Duration::from_secs(30 * 60);
/// Default activity `startToClose` timeout (§4.1).
pub const DEFAULT_START_TO_CLOSE: Duration = Duration::from_secs(5 * 60);
/// Default activity heartbeat interval (§4.1).
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);
/// Default activity retry attempt count (§4.1).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default exponential backoff initial interval (§4.1).
pub const DEFAULT_RETRY_INITIAL: Duration = Duration::from_secs(1);
/// Default exponential backoff coefficient (§4.1).
pub const DEFAULT_RETRY_COEFFICIENT: f64 = 2.0;
/// Default exponential backoff cap (§4.1).
pub const DEFAULT_RETRY_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Planning execution timeout for the Planning child workflow (§4.1 step 2).
pub const PLANNING_EXECUTION_TIMEOUT: Duration = Duration::from_secs(5 * 60 * 60);
/// WESExecution child workflow timeout (§4.1 step 3).
pub const WES_EXECUTION_TIMEOUT: Duration = Duration::from_secs(4 * 60 * 60);

/// `pickCompleted` signal wait (§4.4.1).
pub const PICK_COMPLETED_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// `wallingCompleted` signal wait (§4.3).
pub const WALLING_COMPLETED_TIMEOUT: Duration = Duration::from_secs(15 * 60);
/// `toteArrived` signal wait (§4.4.3).
pub const TOTE_ARRIVED_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// `gift-wrap-completed` signal wait (§4.4.5).
pub const GIFT_WRAP_COMPLETED_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Wave-assignment timeout, keyed by order priority (§4.2 step 9, §6).
pub fn wave_timeout(priority: Priority) -> Duration {
    match priority {
        Priority::SameDay => Duration::from_secs(30 * 60),
        Priority::NextDay => Duration::from_secs(2 * 60 * 60),
        Priority::Standard => Duration::from_secs(4 * 60 * 60),
    }
}

/// Maximum units of work a `ReprocessingOrchestration` instance processes
/// before emitting a continuation (§4.5, §8 "bounded continuation depth").
pub const MAX_WORKFLOWS_PER_CONTINUATION: u32 = 1000;

/// Ratio threshold above which a stock shortage partial-ships rather than
/// holding for review (§4.4.7).
pub const PARTIAL_SHIP_RATIO_THRESHOLD: f64 = 0.50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_timeout_matches_priority_table() {
        assert_eq!(wave_timeout(Priority::SameDay), Duration::from_secs(1800));
        assert_eq!(wave_timeout(Priority::NextDay), Duration::from_secs(7200));
        assert_eq!(wave_timeout(Priority::Standard), Duration::from_secs(14400));
    }
}
