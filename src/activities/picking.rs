//! OrchestratedPicking activities (§4.4.1).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{AllocationId, OrderId, ReservationId, TaskId};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePickTaskOutput {
    pub task_id: TaskId,
}

pub async fn create_pick_task<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<CreatePickTaskOutput, ActivityError> {
    ctx.execute_activity("CreatePickTask", order_id, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchReservationIdsOutput {
    pub reservation_ids: Vec<ReservationId>,
}

pub async fn fetch_reservation_ids<C: WorkflowContext>(
    ctx: &C,
    task_id: TaskId,
    options: &ActivityOptions,
) -> Result<FetchReservationIdsOutput, ActivityError> {
    ctx.execute_activity("FetchReservationIds", task_id, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct StageInventoryInput {
    pub reservation_ids: Vec<ReservationId>,
    pub tote_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageInventoryOutput {
    pub allocation_ids: Vec<AllocationId>,
}

/// Soft-to-hard promotion of the reservations picked into a tote
/// (§4.4.1). Best-effort: staging is reconcilable, never fatal.
pub async fn stage_inventory<C: WorkflowContext>(
    ctx: &C,
    input: StageInventoryInput,
    options: &ActivityOptions,
) -> Result<StageInventoryOutput, ActivityError> {
    ctx.execute_activity("StageInventory", input, &options.clone().best_effort()).await
}
