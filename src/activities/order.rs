//! OrderFulfillment-level activities (§4.1): validation and SLAM.

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{CarrierId, ManifestId, OrderId, PackageId, TrackingNumber};
use crate::types::order::OrderRequest;

#[derive(Debug, Clone, Serialize)]
pub struct ValidateOrderInput<'a> {
    pub order: &'a OrderRequest,
}

pub async fn validate_order<C: WorkflowContext>(
    ctx: &C,
    order: &OrderRequest,
    options: &ActivityOptions,
) -> Result<bool, ActivityError> {
    ctx.execute_activity("ValidateOrder", ValidateOrderInput { order }, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteSlamInput {
    pub order_id: OrderId,
    pub package_id: PackageId,
    pub expected_weight: f64,
    pub carrier: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteSlamOutput {
    pub tracking_number: TrackingNumber,
    pub manifest_id: ManifestId,
    pub actual_weight: f64,
    pub weight_variance_percent: f64,
    pub carrier_id: CarrierId,
    pub destination: String,
}

pub async fn execute_slam<C: WorkflowContext>(
    ctx: &C,
    input: ExecuteSlamInput,
    options: &ActivityOptions,
) -> Result<ExecuteSlamOutput, ActivityError> {
    ctx.execute_activity("ExecuteSLAM", input, options).await
}

pub async fn mark_packed<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("MarkPacked", order_id, &options.clone().best_effort()).await
}
