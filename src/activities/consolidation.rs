//! Consolidation activities (§4.4.3).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{OrderId, RouteId, UnitId};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConsolidationUnitOutput {
    pub unit_id: UnitId,
}

pub async fn create_consolidation_unit<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<CreateConsolidationUnitOutput, ActivityError> {
    ctx.execute_activity("CreateConsolidationUnit", order_id, options).await
}

pub async fn consolidate_items<C: WorkflowContext>(
    ctx: &C,
    unit_id: UnitId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ConsolidateItems", unit_id, options).await
}

pub async fn verify_consolidation<C: WorkflowContext>(
    ctx: &C,
    unit_id: UnitId,
    options: &ActivityOptions,
) -> Result<bool, ActivityError> {
    ctx.execute_activity("VerifyConsolidation", unit_id, options).await
}

pub async fn complete_consolidation<C: WorkflowContext>(
    ctx: &C,
    unit_id: UnitId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("CompleteConsolidation", unit_id, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmUnitConsolidationInput {
    pub unit_id: UnitId,
    pub route_id: RouteId,
}

pub async fn confirm_unit_consolidation<C: WorkflowContext>(
    ctx: &C,
    input: ConfirmUnitConsolidationInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ConfirmUnitConsolidation", input, &options.clone().best_effort()).await
}
