//! WESExecution activities (§4.3): plan resolution, task routing, and
//! per-stage lifecycle calls.

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{OrderId, PathId, RouteId};
use crate::types::process_path::PathType;

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveExecutionPlanOutput {
    pub path_type: PathType,
    pub stages: Vec<String>,
}

pub async fn resolve_execution_plan<C: WorkflowContext>(
    ctx: &C,
    path_id: PathId,
    options: &ActivityOptions,
) -> Result<ResolveExecutionPlanOutput, ActivityError> {
    ctx.execute_activity("ResolveExecutionPlan", path_id, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRouteOutput {
    pub route_id: RouteId,
}

pub async fn create_task_route<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    path_id: PathId,
    options: &ActivityOptions,
) -> Result<CreateTaskRouteOutput, ActivityError> {
    #[derive(Serialize)]
    struct Input {
        order_id: OrderId,
        path_id: PathId,
    }
    ctx.execute_activity("CreateTaskRoute", Input { order_id, path_id }, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct StageInput<'a> {
    pub route_id: &'a RouteId,
    pub stage: &'a str,
}

pub async fn assign_worker_to_stage<C: WorkflowContext>(
    ctx: &C,
    input: StageInput<'_>,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("AssignWorkerToStage", input, options).await
}

pub async fn start_stage<C: WorkflowContext>(
    ctx: &C,
    input: StageInput<'_>,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("StartStage", input, options).await
}

pub async fn complete_stage<C: WorkflowContext>(
    ctx: &C,
    input: StageInput<'_>,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("CompleteStage", input, &options.clone().best_effort()).await
}

pub async fn fail_stage<C: WorkflowContext>(
    ctx: &C,
    input: StageInput<'_>,
    reason: &str,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    #[derive(Serialize)]
    struct Input<'a> {
        route_id: &'a RouteId,
        stage: &'a str,
        reason: &'a str,
    }
    ctx.execute_activity(
        "FailStage",
        Input { route_id: input.route_id, stage: input.stage, reason },
        &options.clone().best_effort(),
    )
    .await
}

/// Walling is an activity plus a 15-minute `wallingCompleted` signal
/// wait, not a child workflow (§4.3).
pub async fn execute_walling_task<C: WorkflowContext>(
    ctx: &C,
    route_id: RouteId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ExecuteWallingTask", route_id, options).await
}
