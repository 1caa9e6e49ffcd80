//! Allocation lifecycle, wave assignment, and pick-result payloads (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AllocationId, Sku, StationId, TaskId, ToteId, WaveId};

/// Allocation lifecycle: `available -> soft_reserved -> hard_allocated ->
/// packed -> shipped -> removed`. Soft reservations release on
/// cancel-without-stage; hard allocations require explicit
/// return-to-shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationState {
    Available,
    SoftReserved,
    HardAllocated,
    Packed,
    Shipped,
    Removed,
}

impl AllocationState {
    /// Whether this allocation can still be released with a plain
    /// (non-physical) `ReleaseUnits`/`ReleaseInventoryReservation` call.
    pub fn is_soft(&self) -> bool {
        matches!(self, AllocationState::Available | AllocationState::SoftReserved)
    }

    /// Whether this allocation requires `ReturnInventoryToShelf` rather
    /// than a logical release.
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            AllocationState::HardAllocated | AllocationState::Packed
        )
    }
}

/// `waveAssigned` signal payload (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveAssignment {
    pub wave_id: WaveId,
    pub scheduled_start: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickedItem {
    pub sku: Sku,
    pub qty: u32,
    pub location_id: String,
    pub tote_id: ToteId,
}

/// `pickCompleted` signal payload and `PickResult` activity output (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickResult {
    pub task_id: TaskId,
    pub picked_items: Vec<PickedItem>,
    pub allocation_ids: Vec<AllocationId>,
    pub success: bool,
    /// Present only when per-unit tracking is enabled for this order.
    pub unit_ids: Option<Vec<String>>,
}

/// `{allocationId, sku}` pair used when returning hard allocations to
/// shelf on cancellation (§4.4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnItem {
    pub allocation_id: AllocationId,
    pub sku: Sku,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationAssignment {
    pub station_id: StationId,
    pub reservation_id: String,
}
