//! Failure vocabulary and reprocessing accumulators (§4.5, §6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{OrderId, WaveId, WorkflowId};

/// Closed vocabulary of terminal failure classifications recorded on a
/// DLQ entry. Only `WaveTimeout` and `PickTimeout` are reprocessable
/// (Open Question resolved in favor of the narrower set; see
/// `SPEC_FULL.md` §9) — the rest require a human decision before any
/// retry is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStatus {
    WaveTimeout,
    PickTimeout,
    ShortageUnresolved,
    CompensationFailed,
    ActivityExhausted,
    ChildWorkflowFailed,
    Cancelled,
}

impl FailureStatus {
    pub fn is_reprocessable(&self) -> bool {
        matches!(self, FailureStatus::WaveTimeout | FailureStatus::PickTimeout)
    }
}

/// A single entry accumulated by the DLQ and consumed by
/// `ReprocessingBatch` (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedWorkflowInfo {
    pub workflow_id: WorkflowId,
    pub order_id: OrderId,
    pub wave_id: Option<WaveId>,
    pub status: FailureStatus,
    pub failed_at: DateTime<Utc>,
    pub attempt: u32,
    pub detail: String,
}

/// Running counters surfaced by `ReprocessingOrchestration` across its
/// continuation chain (§4.5 step 4).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReprocessingResult {
    pub scanned: u64,
    pub reprocessed: u64,
    pub skipped_not_reprocessable: u64,
    pub still_failing: u64,
}

impl ReprocessingResult {
    pub fn merge(&mut self, other: &ReprocessingResult) {
        self.scanned += other.scanned;
        self.reprocessed += other.reprocessed;
        self.skipped_not_reprocessable += other.skipped_not_reprocessable;
        self.still_failing += other.still_failing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeouts_are_reprocessable() {
        assert!(FailureStatus::WaveTimeout.is_reprocessable());
        assert!(FailureStatus::PickTimeout.is_reprocessable());
        assert!(!FailureStatus::ShortageUnresolved.is_reprocessable());
        assert!(!FailureStatus::CompensationFailed.is_reprocessable());
        assert!(!FailureStatus::ActivityExhausted.is_reprocessable());
        assert!(!FailureStatus::ChildWorkflowFailed.is_reprocessable());
        assert!(!FailureStatus::Cancelled.is_reprocessable());
    }

    #[test]
    fn merge_accumulates_counters() {
        let mut total = ReprocessingResult::default();
        total.merge(&ReprocessingResult {
            scanned: 10,
            reprocessed: 4,
            skipped_not_reprocessable: 5,
            still_failing: 1,
        });
        total.merge(&ReprocessingResult {
            scanned: 3,
            reprocessed: 1,
            skipped_not_reprocessable: 2,
            still_failing: 0,
        });
        assert_eq!(total.scanned, 13);
        assert_eq!(total.reprocessed, 5);
        assert_eq!(total.skipped_not_reprocessable, 7);
        assert_eq!(total.still_failing, 1);
    }
}
