//! StockShortage activities (§4.4.7).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{OrderId, Sku};
use crate::types::tags::ShortageReason;

/// Strategy selected by `ratio = available / requested` across
/// completed and short items (§4.4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortageStrategy {
    PartialShip,
    HoldForReview,
    FullBackorder,
}

pub fn select_shortage_strategy(completed_count: usize, ratio: f64) -> ShortageStrategy {
    if completed_count == 0 {
        ShortageStrategy::FullBackorder
    } else if ratio >= crate::constants::PARTIAL_SHIP_RATIO_THRESHOLD {
        ShortageStrategy::PartialShip
    } else {
        ShortageStrategy::HoldForReview
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordShortageInput {
    pub order_id: OrderId,
    pub sku: Sku,
    pub requested: u32,
    pub available: u32,
    pub reason: ShortageReason,
}

pub async fn record_shortage<C: WorkflowContext>(
    ctx: &C,
    input: RecordShortageInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("RecordShortage", input, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBackorderInput {
    pub order_id: OrderId,
    pub skus: Vec<Sku>,
}

pub async fn create_backorder<C: WorkflowContext>(
    ctx: &C,
    input: CreateBackorderInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("CreateBackorder", input, options).await
}

pub async fn notify_supervisor_shortage<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("NotifySupervisorShortage", order_id, &options.clone().best_effort()).await
}

pub async fn notify_customer_partial_ship<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("NotifyCustomerPartialShip", order_id, &options.clone().best_effort()).await
}

pub async fn notify_customer_full_backorder<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("NotifyCustomerFullBackorder", order_id, &options.clone().best_effort()).await
}
