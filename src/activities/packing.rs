//! Packing activities (§4.4.2).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{OrderId, PackageId, TaskId, TrackingNumber};

pub async fn create_pack_task<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<TaskId, ActivityError> {
    ctx.execute_activity("CreatePackTask", order_id, options).await
}

pub async fn start_pack_task<C: WorkflowContext>(
    ctx: &C,
    task_id: TaskId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("StartPackTask", task_id, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectPackagingMaterialsOutput {
    pub package_id: PackageId,
}

pub async fn select_packaging_materials<C: WorkflowContext>(
    ctx: &C,
    task_id: TaskId,
    options: &ActivityOptions,
) -> Result<SelectPackagingMaterialsOutput, ActivityError> {
    ctx.execute_activity("SelectPackagingMaterials", task_id, options).await
}

pub async fn pack_items<C: WorkflowContext>(
    ctx: &C,
    package_id: PackageId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("PackItems", package_id, options).await
}

pub async fn weigh_package<C: WorkflowContext>(
    ctx: &C,
    package_id: PackageId,
    options: &ActivityOptions,
) -> Result<f64, ActivityError> {
    ctx.execute_activity("WeighPackage", package_id, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateShippingLabelOutput {
    pub tracking_number: TrackingNumber,
    pub carrier: String,
    pub label_url: String,
}

pub async fn generate_shipping_label<C: WorkflowContext>(
    ctx: &C,
    package_id: PackageId,
    options: &ActivityOptions,
) -> Result<GenerateShippingLabelOutput, ActivityError> {
    ctx.execute_activity("GenerateShippingLabel", package_id, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyLabelInput {
    pub package_id: PackageId,
    pub label_url: String,
}

pub async fn apply_label_to_package<C: WorkflowContext>(
    ctx: &C,
    input: ApplyLabelInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ApplyLabelToPackage", input, options).await
}

pub async fn seal_package<C: WorkflowContext>(
    ctx: &C,
    package_id: PackageId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("SealPackage", package_id, options).await
}

pub async fn pack_inventory<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("PackInventory", order_id, &options.clone().best_effort()).await
}

pub async fn confirm_unit_packed<C: WorkflowContext>(
    ctx: &C,
    unit_id: crate::types::ids::UnitId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ConfirmUnitPacked", unit_id, &options.clone().best_effort()).await
}

pub async fn complete_pack_task<C: WorkflowContext>(
    ctx: &C,
    task_id: TaskId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("CompletePackTask", task_id, &options.clone().best_effort()).await
}
