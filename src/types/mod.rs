//! Domain data model (§3): opaque ids, order requests, process paths,
//! allocation lifecycle, and the failure vocabulary shared by every
//! workflow and activity trait.

pub mod allocation;
pub mod failure;
pub mod ids;
pub mod order;
pub mod process_path;
pub mod tags;

pub use allocation::{AllocationState, PickResult, PickedItem, ReturnItem, StationAssignment, WaveAssignment};
pub use failure::{FailedWorkflowInfo, FailureStatus, ReprocessingResult};
pub use tags::{EquipmentType, EscalationTier, ShortageReason, SkillType};
pub use ids::{
    AllocationId, BatchId, CarrierId, ChuteId, CustomerId, ManifestId, OrderId, PackageId, PathId,
    ReservationId, RouteId, RunId, Sku, StationId, TaskId, ToteId, TrackingNumber, UnitId, WaveId,
    WorkflowId,
};
pub use order::{ColdChainDetails, GiftWrapRequest, HazmatDetails, OrderItem, OrderRequest, Priority};
pub use process_path::{PathType, ProcessPath, Requirement, ZoneLayout};
