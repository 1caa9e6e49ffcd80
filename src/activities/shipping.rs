//! Shipping (SLAM finalization) activities (§4.4.4).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{CarrierId, ChuteId, ManifestId, OrderId, PackageId, TrackingNumber, UnitId};

#[derive(Debug, Clone, Serialize)]
pub struct CreateShipmentInput {
    pub order_id: OrderId,
    pub package_id: PackageId,
}

pub async fn create_shipment<C: WorkflowContext>(
    ctx: &C,
    input: CreateShipmentInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("CreateShipment", input, options).await
}

pub async fn scan_package<C: WorkflowContext>(
    ctx: &C,
    package_id: PackageId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ScanPackage", package_id, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyShippingLabelInput {
    pub package_id: PackageId,
    pub tracking_number: TrackingNumber,
}

/// Fatal on mismatch (§4.4.4) — non-retryable, not a best-effort call.
pub async fn verify_shipping_label<C: WorkflowContext>(
    ctx: &C,
    input: VerifyShippingLabelInput,
    options: &ActivityOptions,
) -> Result<bool, ActivityError> {
    ctx.execute_activity("VerifyShippingLabel", input, options).await
}

pub async fn place_on_outbound_dock<C: WorkflowContext>(
    ctx: &C,
    package_id: PackageId,
    options: &ActivityOptions,
) -> Result<ChuteId, ActivityError> {
    ctx.execute_activity("PlaceOnOutboundDock", package_id, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct AddToCarrierManifestInput {
    pub package_id: PackageId,
    pub carrier_id: CarrierId,
}

pub async fn add_to_carrier_manifest<C: WorkflowContext>(
    ctx: &C,
    input: AddToCarrierManifestInput,
    options: &ActivityOptions,
) -> Result<ManifestId, ActivityError> {
    ctx.execute_activity("AddToCarrierManifest", input, options).await
}

pub async fn mark_order_shipped<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("MarkOrderShipped", order_id, options).await
}

pub async fn ship_inventory<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ShipInventory", order_id, &options.clone().best_effort()).await
}

pub async fn notify_customer_shipped<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("NotifyCustomerShipped", order_id, &options.clone().best_effort()).await
}

pub async fn confirm_unit_shipped<C: WorkflowContext>(
    ctx: &C,
    unit_id: UnitId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ConfirmUnitShipped", unit_id, &options.clone().best_effort()).await
}
