//! GiftWrap activities (§4.4.5).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{OrderId, StationId, TaskId};

#[derive(Debug, Clone, Deserialize)]
pub struct FindCapableStationOutput {
    pub station_id: StationId,
}

pub async fn find_capable_station<C: WorkflowContext>(
    ctx: &C,
    station_type: &str,
    options: &ActivityOptions,
) -> Result<FindCapableStationOutput, ActivityError> {
    #[derive(Serialize)]
    struct Input<'a> {
        station_type: &'a str,
    }
    ctx.execute_activity("FindCapableStation", Input { station_type }, options).await
}

pub async fn create_gift_wrap_task<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    station_id: Option<StationId>,
    options: &ActivityOptions,
) -> Result<TaskId, ActivityError> {
    #[derive(Serialize)]
    struct Input {
        order_id: OrderId,
        station_id: Option<StationId>,
    }
    ctx.execute_activity("CreateGiftWrapTask", Input { order_id, station_id }, options).await
}

pub async fn assign_gift_wrap_worker<C: WorkflowContext>(
    ctx: &C,
    task_id: TaskId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("AssignGiftWrapWorker", task_id, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckGiftWrapStatusOutput {
    pub completed: bool,
}

pub async fn check_gift_wrap_status<C: WorkflowContext>(
    ctx: &C,
    task_id: TaskId,
    options: &ActivityOptions,
) -> Result<CheckGiftWrapStatusOutput, ActivityError> {
    ctx.execute_activity("CheckGiftWrapStatus", task_id, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyGiftMessageInput {
    pub task_id: TaskId,
    pub message: Option<String>,
}

pub async fn apply_gift_message<C: WorkflowContext>(
    ctx: &C,
    input: ApplyGiftMessageInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ApplyGiftMessage", input, &options.clone().best_effort()).await
}

pub async fn complete_gift_wrap_task<C: WorkflowContext>(
    ctx: &C,
    task_id: TaskId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("CompleteGiftWrapTask", task_id, options).await
}
